//! Key/value table renderer: a fixed two-column (label/value) table
//! rendered as one full-width block. Tables are never split across
//! columns or pages; a table that doesn't fit in the remaining height
//! starts on a fresh page whole.

use crate::error::SurfaceError;
use crate::layout::PageFlow;
use crate::render::{ensure_page, truncate};
use crate::surface::{Color, RectStyle, RenderSurface, TextStyle};

#[derive(Debug, Clone)]
pub struct TableOptions {
    pub row_height: f64,
    pub title_height: f64,
    /// Fraction of the table width given to the label column.
    pub label_fraction: f64,
    pub font_size: f64,
    /// Character budget for values before truncation.
    pub value_chars: usize,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            row_height: 16.0,
            title_height: 20.0,
            label_fraction: 0.35,
            font_size: 9.0,
            value_chars: 80,
        }
    }
}

/// Render a titled label/value table as a single block of
/// `title_height + rows * row_height`.
pub fn render_key_value_table<S: RenderSurface>(
    flow: &mut PageFlow,
    surface: &mut S,
    title: &str,
    rows: &[(&str, String)],
    opts: &TableOptions,
) -> Result<(), SurfaceError> {
    let block_height = opts.title_height + rows.len() as f64 * opts.row_height;
    let placement = flow.reserve_full_width(block_height);
    ensure_page(surface, &placement)?;

    surface.draw_text(
        placement.x,
        placement.y + opts.title_height - 7.0,
        title,
        &TextStyle::bold(11.0),
    )?;

    let body_top = placement.y + opts.title_height;
    let label_width = placement.width * opts.label_fraction;
    let style = TextStyle::sized(opts.font_size);
    let label_style = TextStyle::bold(opts.font_size);

    for (i, (label, value)) in rows.iter().enumerate() {
        let row_y = body_top + i as f64 * opts.row_height;
        if i % 2 == 0 {
            surface.draw_rect(
                placement.x,
                row_y,
                placement.width,
                opts.row_height,
                &RectStyle::filled(Color::gray(0.94)),
            )?;
        }
        let baseline = row_y + opts.row_height - 5.0;
        surface.draw_text(placement.x + 4.0, baseline, label, &label_style)?;
        surface.draw_text(
            placement.x + label_width + 4.0,
            baseline,
            &truncate(value, opts.value_chars),
            &style,
        )?;
    }

    surface.draw_rect(
        placement.x,
        body_top,
        placement.width,
        rows.len() as f64 * opts.row_height,
        &RectStyle::default(),
    )?;
    Ok(())
}
