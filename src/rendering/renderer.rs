use crate::{
    core::{config::RenderConfig, projection::project_ring, viewport::Viewport},
    data::region::Region,
    rendering::{
        color::{color_of, RegionColor},
        surface::{Canvas, DoubleBuffer, Surface},
    },
    Result,
};

/// Fixed colors of a frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderStyle {
    /// Open water / unclaimed space
    pub background: RegionColor,
    pub boundary: RegionColor,
    pub boundary_width: f32,
}

impl RenderStyle {
    pub fn from_config(config: &RenderConfig) -> Result<Self> {
        Ok(Self {
            background: config.background_color()?,
            boundary: config.boundary_color()?,
            boundary_width: config.boundary_width,
        })
    }
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            background: RegionColor::new(0x55, 0xa9, 0xed),
            boundary: RegionColor::BLACK,
            boundary_width: crate::constants::BOUNDARY_WIDTH,
        }
    }
}

/// Counters for one drawn frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    pub regions: usize,
    pub rings_drawn: usize,
    pub rings_skipped: usize,
}

/// Draws whole frames into a double buffer.
///
/// Every call to [`Renderer::render`] repaints from scratch; nothing from the
/// previous frame is reused.
#[derive(Debug, Clone)]
pub struct Renderer {
    style: RenderStyle,
    buffer: DoubleBuffer,
}

impl Renderer {
    pub fn new(width: u32, height: u32, style: RenderStyle) -> Result<Self> {
        // fail at construction rather than on the first frame
        Canvas::new(width, height)?;
        Ok(Self {
            style,
            buffer: DoubleBuffer::new(width, height)?,
        })
    }

    pub fn from_config(config: &RenderConfig) -> Result<Self> {
        Self::new(config.width, config.height, RenderStyle::from_config(config)?)
    }

    pub fn style(&self) -> &RenderStyle {
        &self.style
    }

    /// The last presented frame
    pub fn front(&self) -> &Surface {
        self.buffer.front()
    }

    pub fn presented_frames(&self) -> u64 {
        self.buffer.presented_frames()
    }

    /// Draws `regions` as seen through `viewport` and presents the frame
    pub fn render(&mut self, viewport: &Viewport, regions: &[Region]) -> Result<FrameStats> {
        let style = self.style;
        let surface = self.buffer.back_mut();
        let size = surface.size();
        let mut canvas = Canvas::for_surface(surface)?;
        let mut stats = FrameStats {
            regions: regions.len(),
            ..FrameStats::default()
        };

        canvas.fill_background(style.background);

        for region in regions {
            let fill = color_of(&region.name);

            for ring in &region.rings {
                if ring.is_empty() {
                    log::debug!("skipping empty ring in {:?}", region.name);
                    stats.rings_skipped += 1;
                    continue;
                }

                let path = project_ring(ring, viewport, size.x, size.y);
                canvas.fill_ring(&path, fill);
                canvas.stroke_ring(&path, style.boundary, style.boundary_width);
                stats.rings_drawn += 1;
            }
        }

        surface.draw(&mut canvas)?;
        self.buffer.present()?;
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::LatLng;

    fn world() -> Viewport {
        // 1 pixel per degree on a 360x180 surface
        Viewport::new(LatLng::new(90.0, -180.0), 360.0, 180.0)
    }

    fn block(name: &str, north: f64, west: f64, south: f64, east: f64) -> Region {
        Region::new(
            name,
            vec![vec![
                LatLng::new(north, west),
                LatLng::new(north, east),
                LatLng::new(south, east),
                LatLng::new(south, west),
            ]],
        )
    }

    #[test]
    fn test_empty_region_list_renders_background() {
        let mut renderer = Renderer::new(360, 180, RenderStyle::default()).unwrap();
        let stats = renderer.render(&world(), &[]).unwrap();

        assert_eq!(stats, FrameStats::default());
        let water = RenderStyle::default().background.to_rgba();
        assert!(renderer.front().image().pixels().all(|p| *p == water));
    }

    #[test]
    fn test_region_filled_with_its_color_and_outlined() {
        // a 2px outline on whole-degree edges covers whole pixels
        let style = RenderStyle {
            boundary_width: 2.0,
            ..RenderStyle::default()
        };
        let mut renderer = Renderer::new(360, 180, style).unwrap();
        let region = block("France", 50.0, 0.0, 40.0, 10.0);
        renderer.render(&world(), &[region]).unwrap();

        // lat 45, lng 5 sits at pixel (185, 45)
        let fill = color_of("France").to_rgba();
        assert_eq!(renderer.front().pixel(185, 45), Some(fill));
        assert_eq!(renderer.front().pixel(185, 40), Some(RegionColor::BLACK.to_rgba()));
        assert_eq!(
            renderer.front().pixel(100, 100),
            Some(RenderStyle::default().background.to_rgba())
        );
    }

    #[test]
    fn test_empty_rings_are_skipped() {
        let mut renderer = Renderer::new(360, 180, RenderStyle::default()).unwrap();
        let mut region = block("Chile", -20.0, -75.0, -50.0, -70.0);
        region.rings.insert(0, vec![]);

        let stats = renderer
            .render(&world(), &[Region::new("Ghost", vec![vec![]]), region])
            .unwrap();

        assert_eq!(stats.rings_skipped, 2);
        assert_eq!(stats.rings_drawn, 1);
        assert_eq!(
            renderer.front().pixel(107, 125),
            Some(color_of("Chile").to_rgba())
        );
    }

    #[test]
    fn test_each_frame_starts_from_scratch() {
        let mut renderer = Renderer::new(360, 180, RenderStyle::default()).unwrap();
        renderer
            .render(&world(), &[block("Peru", 0.0, -80.0, -15.0, -70.0)])
            .unwrap();
        renderer.render(&world(), &[]).unwrap();

        assert_eq!(
            renderer.front().pixel(105, 97),
            Some(RenderStyle::default().background.to_rgba())
        );
        assert_eq!(renderer.presented_frames(), 2);
    }

    #[test]
    fn test_oversized_renderer_rejected() {
        let result = Renderer::new(100_000, 10, RenderStyle::default());
        assert!(matches!(result, Err(crate::MapError::Surface(_))));
    }

    #[test]
    fn test_style_from_config() {
        let config = RenderConfig {
            background: "#fff".to_string(),
            ..RenderConfig::default()
        };
        let style = RenderStyle::from_config(&config).unwrap();

        assert_eq!(style.background, RegionColor::new(255, 255, 255));
        assert_eq!(style.boundary, RegionColor::BLACK);
    }
}
