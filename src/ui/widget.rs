use crate::{
    core::{geo::Point, viewport::Viewport},
    input::{InputEvent, KeyCode},
    runtime::{Frame, SessionHandle},
};
use egui::{
    pos2, Color32, ColorImage, CursorIcon, Modifiers, Rect, Response, Sense, TextureHandle,
    TextureOptions, Ui, Vec2,
};
use image::RgbaImage;
use std::time::Duration;

/// How often the widget polls the session for frames while idle
const FRAME_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Shows the frames of a [`MapSession`](crate::runtime::MapSession) and feeds
/// pointer drags and the zoom modifier keys back to it.
///
/// ```rust,ignore
/// let (handle, _task) = MapSession::new(map, source).spawn();
/// let mut widget = MapWidget::new(handle);
/// // inside an egui frame
/// widget.show(ui);
/// ```
pub struct MapWidget {
    session: SessionHandle,
    texture: Option<TextureHandle>,
    frame: Option<Frame>,
    modifiers: Modifiers,
    dragging: bool,
    pub interactive: bool,
    pub background: Color32,
}

impl MapWidget {
    pub fn new(session: SessionHandle) -> Self {
        Self {
            session,
            texture: None,
            frame: None,
            modifiers: Modifiers::default(),
            dragging: false,
            interactive: true,
            background: Color32::from_rgb(0x55, 0xa9, 0xed),
        }
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    /// View of the frame currently displayed
    pub fn viewport(&self) -> Option<&Viewport> {
        self.frame.as_ref().map(|frame| &frame.viewport)
    }

    pub fn generation(&self) -> Option<u64> {
        self.frame.as_ref().map(|frame| frame.generation)
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn show(&mut self, ui: &mut Ui) -> Response {
        self.pull_frame(ui.ctx());

        let desired_size = match &self.frame {
            Some(frame) => Vec2::new(frame.image.width() as f32, frame.image.height() as f32),
            None => ui.available_size(),
        };
        let (rect, response) = ui.allocate_exact_size(desired_size, Sense::click_and_drag());

        match &self.texture {
            Some(texture) => {
                let uv = Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));
                ui.painter().image(texture.id(), rect, uv, Color32::WHITE);
            }
            None => {
                ui.painter().rect_filled(rect, 0.0, self.background);
            }
        }

        if self.interactive {
            self.forward_pointer(&response, rect);
            self.forward_keys(ui);
        }

        ui.ctx().request_repaint_after(FRAME_POLL_INTERVAL);

        if self.dragging {
            ui.ctx().set_cursor_icon(CursorIcon::Grabbing);
            response
        } else {
            response.on_hover_cursor(CursorIcon::Grab)
        }
    }

    fn pull_frame(&mut self, ctx: &egui::Context) {
        let Some(frame) = self.session.latest_frame_if_new() else {
            return;
        };

        let image = to_color_image(&frame.image);
        match &mut self.texture {
            Some(texture) => texture.set(image, TextureOptions::NEAREST),
            None => {
                self.texture = Some(ctx.load_texture("geocanvas-frame", image, TextureOptions::NEAREST))
            }
        }
        self.frame = Some(frame);
    }

    fn forward_pointer(&mut self, response: &Response, rect: Rect) {
        let position = response
            .interact_pointer_pos()
            .map(|pos| Point::new((pos.x - rect.min.x) as f64, (pos.y - rect.min.y) as f64));

        if response.drag_started() {
            if let Some(position) = position {
                self.dragging = true;
                self.send(InputEvent::PointerDown { position });
            }
        } else if response.dragged() {
            if let Some(position) = position {
                self.send(InputEvent::PointerMove { position });
            }
        }

        if response.drag_released() && self.dragging {
            self.dragging = false;
            self.send(InputEvent::PointerUp);
        }
    }

    fn forward_keys(&mut self, ui: &Ui) {
        let now = ui.input(|input| input.modifiers);
        for key in modifier_presses(self.modifiers, now) {
            self.send(InputEvent::KeyPress { key });
        }
        self.modifiers = now;
    }

    fn send(&self, event: InputEvent) {
        if let Err(e) = self.session.send(event) {
            log::warn!("dropping input event: {}", e);
        }
    }
}

/// Modifier keys that went down between two input snapshots
pub fn modifier_presses(before: Modifiers, now: Modifiers) -> Vec<KeyCode> {
    let mut pressed = Vec::new();
    if now.ctrl && !before.ctrl {
        pressed.push(KeyCode::Control);
    }
    if now.shift && !before.shift {
        pressed.push(KeyCode::Shift);
    }
    pressed
}

pub fn to_color_image(image: &RgbaImage) -> ColorImage {
    let size = [image.width() as usize, image.height() as usize];
    ColorImage::from_rgba_unmultiplied(size, image.as_raw())
}

/// Extension trait for adding a map widget to a Ui
pub trait MapWidgetExt {
    fn map_widget(&mut self, widget: &mut MapWidget) -> Response;
}

impl MapWidgetExt for Ui {
    fn map_widget(&mut self, widget: &mut MapWidget) -> Response {
        widget.show(self)
    }
}
