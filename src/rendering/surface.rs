//! CPU raster surfaces, the vector canvas drawn onto them, and the double
//! buffer the renderer presents from.

use crate::{core::geo::Point, rendering::color::RegionColor, MapError, Result};
use image::{Rgba, RgbaImage};
use peniko::Fill;
use std::path::Path;
use vello_cpu::kurbo::{BezPath, Rect, Stroke};
use vello_cpu::{Pixmap, RenderContext, RenderMode, RenderSettings};

/// A fixed-size RGBA raster
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    image: RgbaImage,
}

impl Surface {
    /// Creates a transparent surface; an empty surface cannot be drawn to
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(MapError::Surface(format!(
                "cannot create a {}x{} surface",
                width, height
            )));
        }
        Ok(Self {
            image: RgbaImage::new(width, height),
        })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Size as a screen point, for projection
    pub fn size(&self) -> Point {
        Point::new(self.width() as f64, self.height() as f64)
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        (x < self.width() && y < self.height()).then(|| *self.image.get_pixel(x, y))
    }

    pub fn clear(&mut self, color: RegionColor) {
        let rgba = color.to_rgba();
        for pixel in self.image.pixels_mut() {
            *pixel = rgba;
        }
    }

    /// Replaces this surface's pixels with `other`'s in one copy
    pub fn copy_from(&mut self, other: &Surface) -> Result<()> {
        if self.image.dimensions() != other.image.dimensions() {
            return Err(MapError::Surface(format!(
                "size mismatch: {:?} vs {:?}",
                self.image.dimensions(),
                other.image.dimensions()
            )));
        }
        self.image.copy_from_slice(other.image.as_raw());
        Ok(())
    }

    /// Rasterizes everything drawn on `canvas` into this surface
    pub fn draw(&mut self, canvas: &mut Canvas) -> Result<()> {
        if (canvas.width as u32, canvas.height as u32) != self.image.dimensions() {
            return Err(MapError::Surface(format!(
                "canvas is {}x{} but the surface is {:?}",
                canvas.width,
                canvas.height,
                self.image.dimensions()
            )));
        }

        let mut pixmap = Pixmap::new(canvas.width, canvas.height);
        canvas.ctx.flush();
        canvas.ctx.render_to_pixmap(&mut pixmap);

        for (pixel, p) in self
            .image
            .pixels_mut()
            .zip(pixmap.take_unpremultiplied())
        {
            *pixel = Rgba([p.r, p.g, p.b, p.a]);
        }
        Ok(())
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        self.image
            .save_with_format(path.as_ref(), image::ImageFormat::Png)?;
        Ok(())
    }
}

/// Front/back surface pair.
///
/// All drawing goes to the back buffer; [`DoubleBuffer::present`] copies the
/// finished frame to the front so observers never see a partial draw.
#[derive(Debug, Clone)]
pub struct DoubleBuffer {
    front: Surface,
    back: Surface,
    presented_frames: u64,
}

impl DoubleBuffer {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Ok(Self {
            front: Surface::new(width, height)?,
            back: Surface::new(width, height)?,
            presented_frames: 0,
        })
    }

    /// The visible frame
    pub fn front(&self) -> &Surface {
        &self.front
    }

    pub fn back_mut(&mut self) -> &mut Surface {
        &mut self.back
    }

    pub fn presented_frames(&self) -> u64 {
        self.presented_frames
    }

    pub fn present(&mut self) -> Result<()> {
        self.front.copy_from(&self.back)?;
        self.presented_frames += 1;
        Ok(())
    }
}

/// Vector drawing commands for one frame.
///
/// Paths are filled with the non-zero winding rule and clipped to the canvas
/// by `vello_cpu`; nothing is rasterized until [`Surface::draw`].
pub struct Canvas {
    ctx: RenderContext,
    width: u16,
    height: u16,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let too_large =
            || MapError::Surface(format!("a {}x{} canvas is too large", width, height));
        let width = u16::try_from(width).map_err(|_| too_large())?;
        let height = u16::try_from(height).map_err(|_| too_large())?;
        if width == 0 || height == 0 {
            return Err(MapError::Surface(format!(
                "cannot create a {}x{} canvas",
                width, height
            )));
        }

        let settings = RenderSettings {
            render_mode: RenderMode::OptimizeSpeed,
            ..RenderSettings::default()
        };
        let mut ctx = RenderContext::new_with(width, height, settings);
        ctx.set_fill_rule(Fill::NonZero);
        Ok(Self { ctx, width, height })
    }

    /// A canvas matching `surface`'s size
    pub fn for_surface(surface: &Surface) -> Result<Self> {
        Self::new(surface.width(), surface.height())
    }

    /// Covers the whole canvas with `color`
    pub fn fill_background(&mut self, color: RegionColor) {
        self.ctx.set_paint(color.to_paint());
        self.ctx.fill_rect(&Rect::new(
            0.0,
            0.0,
            self.width as f64,
            self.height as f64,
        ));
    }

    /// Fills a closed ring. Rings with fewer than three vertices or a
    /// non-finite vertex are ignored.
    pub fn fill_ring(&mut self, points: &[Point], color: RegionColor) {
        if points.len() < 3 {
            return;
        }
        if let Some(path) = ring_path(points) {
            self.ctx.set_paint(color.to_paint());
            self.ctx.fill_path(&path);
        }
    }

    /// Strokes the outline of a closed ring
    pub fn stroke_ring(&mut self, points: &[Point], color: RegionColor, width: f32) {
        if points.len() < 2 || width.is_nan() || width <= 0.0 {
            return;
        }
        if let Some(path) = ring_path(points) {
            self.ctx.set_paint(color.to_paint());
            self.ctx.set_stroke(Stroke::new(width as f64));
            self.ctx.stroke_path(&path);
        }
    }
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

/// Closed path through `points`; `None` if any vertex is not finite
fn ring_path(points: &[Point]) -> Option<BezPath> {
    let (first, rest) = points.split_first()?;
    if !points.iter().all(|p| p.x.is_finite() && p.y.is_finite()) {
        return None;
    }

    let mut path = BezPath::new();
    path.move_to((first.x, first.y));
    for p in rest {
        path.line_to((p.x, p.y));
    }
    path.close_path();
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: RegionColor = RegionColor::new(255, 0, 0);
    const BLUE: RegionColor = RegionColor::new(0, 0, 255);

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Point> {
        vec![
            Point::new(x0, y0),
            Point::new(x1, y0),
            Point::new(x1, y1),
            Point::new(x0, y1),
        ]
    }

    #[test]
    fn test_empty_surface_rejected() {
        assert!(matches!(Surface::new(0, 10), Err(MapError::Surface(_))));
        assert!(matches!(DoubleBuffer::new(10, 0), Err(MapError::Surface(_))));
    }

    fn paint(width: u32, height: u32, draw: impl FnOnce(&mut Canvas)) -> Surface {
        let mut surface = Surface::new(width, height).unwrap();
        let mut canvas = Canvas::for_surface(&surface).unwrap();
        canvas.fill_background(BLUE);
        draw(&mut canvas);
        surface.draw(&mut canvas).unwrap();
        surface
    }

    #[test]
    fn test_oversized_canvas_rejected() {
        assert!(matches!(Canvas::new(70_000, 10), Err(MapError::Surface(_))));
        assert!(matches!(Canvas::new(10, 0), Err(MapError::Surface(_))));
    }

    #[test]
    fn test_canvas_size_must_match() {
        let mut surface = Surface::new(10, 10).unwrap();
        let mut canvas = Canvas::new(20, 10).unwrap();
        assert!(matches!(surface.draw(&mut canvas), Err(MapError::Surface(_))));
    }

    #[test]
    fn test_background_covers_surface() {
        let surface = paint(8, 4, |_| {});
        assert!(surface.image().pixels().all(|p| *p == BLUE.to_rgba()));
    }

    #[test]
    fn test_fill_square() {
        let surface = paint(20, 20, |canvas| {
            canvas.fill_ring(&square(5.0, 5.0, 15.0, 15.0), RED);
        });

        assert_eq!(surface.pixel(5, 5), Some(RED.to_rgba()));
        assert_eq!(surface.pixel(14, 14), Some(RED.to_rgba()));
        assert_eq!(surface.pixel(15, 15), Some(BLUE.to_rgba()));
        assert_eq!(surface.pixel(4, 10), Some(BLUE.to_rgba()));
    }

    #[test]
    fn test_fill_clips_offscreen_geometry() {
        let surface = paint(10, 10, |canvas| {
            canvas.fill_ring(&square(-1.0e5, -1.0e5, 1.0e5, 1.0e5), RED);
        });

        assert!(surface.image().pixels().all(|p| *p == RED.to_rgba()));
    }

    #[test]
    fn test_fill_nonzero_pentagram() {
        // The pentagon in the middle of a star winds twice: non-zero fills it,
        // even-odd would leave a hole.
        let vertex = |k: usize| {
            let angle = (-90.0 + 72.0 * k as f64).to_radians();
            Point::new(10.0 + 9.0 * angle.cos(), 10.0 + 9.0 * angle.sin())
        };
        let star: Vec<Point> = [0, 2, 4, 1, 3].into_iter().map(vertex).collect();

        let surface = paint(20, 20, |canvas| canvas.fill_ring(&star, RED));

        assert_eq!(surface.pixel(10, 10), Some(RED.to_rgba()));
        assert_eq!(surface.pixel(0, 0), Some(BLUE.to_rgba()));
    }

    #[test]
    fn test_degenerate_rings_do_not_fill() {
        let surface = paint(10, 10, |canvas| {
            canvas.fill_ring(&[Point::new(5.0, 5.0)], RED);
            canvas.fill_ring(&[Point::new(1.0, 1.0), Point::new(8.0, 8.0)], RED);
            canvas.fill_ring(
                &[
                    Point::new(f64::NAN, 1.0),
                    Point::new(8.0, 8.0),
                    Point::new(1.0, 8.0),
                ],
                RED,
            );
            canvas.stroke_ring(&[Point::new(5.0, 5.0)], RED, 2.0);
        });

        assert!(surface.image().pixels().all(|p| *p == BLUE.to_rgba()));
    }

    #[test]
    fn test_stroke_ring_outline() {
        // a 2px stroke centred on integer edges covers whole pixels
        let surface = paint(20, 20, |canvas| {
            canvas.stroke_ring(&square(5.0, 5.0, 15.0, 15.0), RED, 2.0);
        });

        assert_eq!(surface.pixel(10, 5), Some(RED.to_rgba()));
        assert_eq!(surface.pixel(15, 10), Some(RED.to_rgba()));
        assert_eq!(surface.pixel(10, 10), Some(BLUE.to_rgba()));
    }

    #[test]
    fn test_ring_path_is_closed() {
        let path = ring_path(&square(0.0, 0.0, 4.0, 4.0)).unwrap();
        assert_eq!(path.elements().len(), 5);
        assert!(ring_path(&[]).is_none());
    }

    #[test]
    fn test_present_copies_back_to_front() {
        let mut buffer = DoubleBuffer::new(4, 4).unwrap();
        buffer.back_mut().clear(RED);
        assert_eq!(buffer.front().pixel(0, 0), Some(Rgba([0, 0, 0, 0])));

        buffer.present().unwrap();
        assert_eq!(buffer.front().pixel(3, 3), Some(RED.to_rgba()));
        assert_eq!(buffer.presented_frames(), 1);
    }
}
