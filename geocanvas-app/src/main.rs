use anyhow::Context as _;
use clap::Parser;
use geocanvas::{
    ui::widget::{MapWidget, MapWidgetExt},
    FrameOutcome, GeometrySource, HttpGeometrySource, Map, MapBuilder, MapConfig, MapSession,
    StaticGeometrySource,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "geocanvas-app")]
#[command(about = "Pannable, zoomable world map viewer")]
struct Args {
    /// JSON config file (missing fields use defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base URL of the country geometry service
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Serve regions from a local JSON file instead of the geometry service
    #[arg(short, long)]
    geometry: Option<PathBuf>,

    /// Width of the map surface in pixels
    #[arg(short = 'W', long)]
    width: Option<u32>,

    /// Height of the map surface in pixels
    #[arg(short = 'H', long)]
    height: Option<u32>,

    /// Render the initial view to a PNG and exit without opening a window
    #[arg(long)]
    snapshot: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = load_config(&args)?;
    let source = select_source(&args, &config)?;
    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;

    if let Some(path) = &args.snapshot {
        return runtime.block_on(snapshot(&config, source, path));
    }

    let _guard = runtime.enter();
    let map = Map::new(&config)?;
    let (handle, session) = MapSession::new(map, source).spawn();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([
                config.render.width as f32 + 16.0,
                config.render.height as f32 + 48.0,
            ])
            .with_title("geocanvas"),
        ..Default::default()
    };

    eframe::run_native(
        "geocanvas-app",
        options,
        Box::new(move |_cc| Box::new(ViewerApp::new(MapWidget::new(handle)))),
    )
    .map_err(|e| anyhow::anyhow!("viewer failed: {}", e))?;

    session.abort();
    log::info!("viewer closed");
    Ok(())
}

fn load_config(args: &Args) -> anyhow::Result<MapConfig> {
    let config = match &args.config {
        Some(path) => MapConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => MapConfig::default(),
    };

    let mut builder = MapBuilder::new().with_config(config);
    if let Some(endpoint) = &args.endpoint {
        builder = builder.with_endpoint(endpoint.clone());
    }
    if args.width.is_some() || args.height.is_some() {
        let render = &builder.config().render;
        let width = args.width.unwrap_or(render.width);
        let height = args.height.unwrap_or(render.height);
        builder = builder.with_size(width, height);
    }

    Ok(builder.into_config()?)
}

fn select_source(args: &Args, config: &MapConfig) -> anyhow::Result<Arc<dyn GeometrySource>> {
    match &args.geometry {
        Some(path) => {
            let source = StaticGeometrySource::from_file(path)
                .with_context(|| format!("failed to load geometry {}", path.display()))?;
            Ok(Arc::new(source))
        }
        None => {
            let source = HttpGeometrySource::from_config(&config.source);
            log::info!("querying {}", source.endpoint());
            Ok(Arc::new(source))
        }
    }
}

async fn snapshot(
    config: &MapConfig,
    source: Arc<dyn GeometrySource>,
    path: &Path,
) -> anyhow::Result<()> {
    let mut map = Map::new(config)?;
    let ticket = map.request_redraw();
    let fetched = source.fetch(ticket.query()).await;

    match map.complete_redraw(ticket, fetched) {
        FrameOutcome::Presented(stats) => {
            map.front().save_png(path)?;
            log::info!(
                "wrote {} ({} regions, {} rings)",
                path.display(),
                stats.regions,
                stats.rings_drawn
            );
            Ok(())
        }
        FrameOutcome::Failed(message) => anyhow::bail!("snapshot failed: {}", message),
        FrameOutcome::Stale => anyhow::bail!("snapshot frame was discarded"),
    }
}

struct ViewerApp {
    map_widget: MapWidget,
}

impl ViewerApp {
    fn new(map_widget: MapWidget) -> Self {
        Self { map_widget }
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("Drag to pan, Ctrl to zoom in, Shift to zoom out");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    match self.map_widget.viewport() {
                        Some(viewport) => ui.label(format!(
                            "Anchor: {:.2}, {:.2} | Extent: {:.2} x {:.2}",
                            viewport.center_lat(),
                            viewport.center_lng(),
                            viewport.extent_width(),
                            viewport.extent_height()
                        )),
                        None => ui.label("Loading..."),
                    };
                });
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.map_widget(&mut self.map_widget);
        });
    }
}
