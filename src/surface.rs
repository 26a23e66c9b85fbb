//! # Render Surface
//!
//! The narrow drawing interface the engine draws through. The host
//! application supplies the real implementation (a PDF writer, a canvas,
//! a print backend); the engine only ever needs page creation, rects,
//! text, text measurement, and images.
//!
//! [`RecordingSurface`] is the implementation shipped with the crate: it
//! captures every operation as data. The integration tests and the CLI
//! layout inspector are built on it.

use crate::error::SurfaceError;
use crate::image_loader::LoadedImage;
use serde::Serialize;

/// RGBA color, each channel 0.0–1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub const BLACK: Color = Color { r: 0.0, g: 0.0, b: 0.0, a: 1.0 };
    pub const WHITE: Color = Color { r: 1.0, g: 1.0, b: 1.0, a: 1.0 };

    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn gray(v: f64) -> Self {
        Self::rgb(v, v, v)
    }
}

/// Style for rectangle drawing. `fill` and `stroke` may both be set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RectStyle {
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_width: f64,
}

impl Default for RectStyle {
    fn default() -> Self {
        Self {
            fill: None,
            stroke: Some(Color::BLACK),
            stroke_width: 0.75,
        }
    }
}

impl RectStyle {
    pub fn filled(color: Color) -> Self {
        Self {
            fill: Some(color),
            stroke: None,
            stroke_width: 0.0,
        }
    }

    pub fn stroked(color: Color, width: f64) -> Self {
        Self {
            fill: None,
            stroke: Some(color),
            stroke_width: width,
        }
    }
}

/// Style for text drawing. Rotation is around the text origin, in
/// degrees counter-clockwise; only the watermark pass uses it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TextStyle {
    pub font_size: f64,
    pub bold: bool,
    pub color: Color,
    pub opacity: f64,
    pub rotate_degrees: f64,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 10.0,
            bold: false,
            color: Color::BLACK,
            opacity: 1.0,
            rotate_degrees: 0.0,
        }
    }
}

impl TextStyle {
    pub fn sized(font_size: f64) -> Self {
        Self { font_size, ..Default::default() }
    }

    pub fn bold(font_size: f64) -> Self {
        Self { font_size, bold: true, ..Default::default() }
    }
}

/// The drawing primitives the engine consumes. Coordinates are in points
/// with the origin at the top-left of the page, y growing downward.
///
/// Pages are 0-indexed for `switch_page`; `create_page` appends a page
/// and makes it active. All drawing targets the active page, which lets
/// the watermark pass revisit finished pages once the final page count
/// is known.
pub trait RenderSurface {
    fn create_page(&mut self) -> Result<(), SurfaceError>;
    fn switch_page(&mut self, index: usize) -> Result<(), SurfaceError>;
    fn draw_rect(&mut self, x: f64, y: f64, w: f64, h: f64, style: &RectStyle)
        -> Result<(), SurfaceError>;
    fn draw_text(&mut self, x: f64, y: f64, text: &str, style: &TextStyle)
        -> Result<(), SurfaceError>;
    fn measure_text(&mut self, text: &str, style: &TextStyle) -> Result<f64, SurfaceError>;
    fn draw_image(
        &mut self,
        image: &LoadedImage,
        x: f64,
        y: f64,
        w: f64,
        h: f64,
    ) -> Result<(), SurfaceError>;
    fn page_count(&self) -> usize;
    /// File extension (without the dot) of documents this surface saves.
    fn file_extension(&self) -> &'static str;
    fn save(&mut self, file_name: &str) -> Result<(), SurfaceError>;
}

// ── Recording surface ───────────────────────────────────────────

/// One recorded drawing operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DrawOp {
    #[serde(rename_all = "camelCase")]
    Rect { x: f64, y: f64, w: f64, h: f64, style: RectStyle },
    #[serde(rename_all = "camelCase")]
    Text { x: f64, y: f64, text: String, style: TextStyle },
    #[serde(rename_all = "camelCase")]
    Image { x: f64, y: f64, w: f64, h: f64, width_px: u32, height_px: u32 },
}

/// A surface that records operations instead of rasterizing them.
///
/// Text measurement uses a flat per-character advance of half the font
/// size — close enough to Helvetica for layout decisions, and fully
/// deterministic.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pages: Vec<Vec<DrawOp>>,
    active: usize,
    saved_as: Option<String>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Operations recorded on the given page.
    pub fn page(&self, index: usize) -> &[DrawOp] {
        &self.pages[index]
    }

    pub fn pages(&self) -> &[Vec<DrawOp>] {
        &self.pages
    }

    /// The file name passed to `save`, if generation completed.
    pub fn saved_as(&self) -> Option<&str> {
        self.saved_as.as_deref()
    }
}

impl RenderSurface for RecordingSurface {
    fn create_page(&mut self) -> Result<(), SurfaceError> {
        self.pages.push(Vec::new());
        self.active = self.pages.len() - 1;
        Ok(())
    }

    fn switch_page(&mut self, index: usize) -> Result<(), SurfaceError> {
        if index >= self.pages.len() {
            return Err(SurfaceError::Draw(format!(
                "switch_page({index}) with only {} pages",
                self.pages.len()
            )));
        }
        self.active = index;
        Ok(())
    }

    fn draw_rect(&mut self, x: f64, y: f64, w: f64, h: f64, style: &RectStyle)
        -> Result<(), SurfaceError>
    {
        self.op(DrawOp::Rect { x, y, w, h, style: *style })
    }

    fn draw_text(&mut self, x: f64, y: f64, text: &str, style: &TextStyle)
        -> Result<(), SurfaceError>
    {
        self.op(DrawOp::Text { x, y, text: text.to_string(), style: *style })
    }

    fn measure_text(&mut self, text: &str, style: &TextStyle) -> Result<f64, SurfaceError> {
        Ok(text.chars().count() as f64 * style.font_size * 0.5)
    }

    fn draw_image(
        &mut self,
        image: &LoadedImage,
        x: f64,
        y: f64,
        w: f64,
        h: f64,
    ) -> Result<(), SurfaceError> {
        self.op(DrawOp::Image {
            x,
            y,
            w,
            h,
            width_px: image.width_px,
            height_px: image.height_px,
        })
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn file_extension(&self) -> &'static str {
        "json"
    }

    fn save(&mut self, file_name: &str) -> Result<(), SurfaceError> {
        self.saved_as = Some(file_name.to_string());
        Ok(())
    }
}

impl RecordingSurface {
    fn op(&mut self, op: DrawOp) -> Result<(), SurfaceError> {
        match self.pages.get_mut(self.active) {
            Some(page) => {
                page.push(op);
                Ok(())
            }
            None => Err(SurfaceError::ContextUnavailable(
                "draw before the first create_page".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drawing_before_any_page_is_a_context_error() {
        let mut surface = RecordingSurface::new();
        let err = surface.draw_text(0.0, 0.0, "x", &TextStyle::default());
        assert!(matches!(err, Err(SurfaceError::ContextUnavailable(_))));
    }

    #[test]
    fn switch_page_targets_earlier_pages() {
        let mut surface = RecordingSurface::new();
        surface.create_page().unwrap();
        surface.create_page().unwrap();
        surface.switch_page(0).unwrap();
        surface.draw_text(1.0, 2.0, "back", &TextStyle::default()).unwrap();
        assert_eq!(surface.page(0).len(), 1);
        assert!(surface.page(1).is_empty());
        assert!(surface.switch_page(5).is_err());
    }

    #[test]
    fn measurement_is_deterministic_and_monotonic() {
        let mut surface = RecordingSurface::new();
        let style = TextStyle::sized(12.0);
        let short = surface.measure_text("ab", &style).unwrap();
        let long = surface.measure_text("abcd", &style).unwrap();
        assert_eq!(short, 12.0);
        assert!(long > short);
    }
}
