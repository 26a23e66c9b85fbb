//! Photo grid renderer: labeled image cells flowing through the
//! two-column layout.
//!
//! One renderer serves both the inspection photo grid and the (shorter)
//! activity photo grids — the cell geometry is a parameter, so the flow
//! logic can never diverge between the two.
//!
//! Commit order is strict: each placement depends on the previous cursor
//! state. Only acquisition runs ahead, through the fetcher's bounded
//! prefetch window; results arrive in input order regardless of which
//! fetch finishes first. A failed photo degrades to a bordered
//! "image unavailable" cell and generation continues.

use futures::StreamExt;
use tracing::warn;

use crate::error::SurfaceError;
use crate::fit::aspect_fit;
use crate::image_loader::PhotoFetcher;
use crate::layout::PageFlow;
use crate::model::{ordered_photos, PhotoRecord};
use crate::render::{ensure_page, truncate};
use crate::surface::{Color, RectStyle, RenderSurface, TextStyle};

/// Cell geometry for one grid.
#[derive(Debug, Clone)]
pub struct PhotoGridOptions {
    /// Height of the image cell.
    pub block_height: f64,
    /// Height of the label chip above the cell.
    pub label_height: f64,
    /// Vertical gap reserved below each cell.
    pub gap: f64,
    /// Inset between the cell border and the image.
    pub cell_padding: f64,
    /// Character budget for the label chip.
    pub label_chars: usize,
}

impl Default for PhotoGridOptions {
    fn default() -> Self {
        Self {
            block_height: 150.0,
            label_height: 14.0,
            gap: 8.0,
            cell_padding: 4.0,
            label_chars: 40,
        }
    }
}

impl PhotoGridOptions {
    /// The shorter cells used inside activity sections.
    pub fn activity() -> Self {
        Self {
            block_height: 110.0,
            ..Self::default()
        }
    }
}

/// What a grid render produced, for the generation summary.
#[derive(Debug, Default)]
pub struct GridOutcome {
    pub cells: usize,
    pub placeholders: usize,
    pub warnings: Vec<String>,
}

pub async fn render_photo_grid<S: RenderSurface>(
    flow: &mut PageFlow,
    surface: &mut S,
    photos: &[PhotoRecord],
    fetcher: &PhotoFetcher,
    opts: &PhotoGridOptions,
) -> Result<GridOutcome, SurfaceError> {
    let ordered = ordered_photos(photos);
    let mut outcome = GridOutcome::default();

    let stream = fetcher.fetch_ordered(&ordered);
    futures::pin_mut!(stream);

    let mut index = 0usize;
    while let Some(result) = stream.next().await {
        let photo = ordered[index];
        index += 1;

        let placement = flow.reserve(opts.label_height + opts.block_height + opts.gap);
        ensure_page(surface, &placement)?;
        outcome.cells += 1;

        draw_label_chip(surface, photo, placement.x, placement.y, placement.width, opts)?;

        let cell_y = placement.y + opts.label_height;
        surface.draw_rect(
            placement.x,
            cell_y,
            placement.width,
            opts.block_height,
            &RectStyle::default(),
        )?;

        match result {
            Ok(image) => {
                let pad = opts.cell_padding;
                let intrinsic = match (photo.intrinsic_width, photo.intrinsic_height) {
                    (Some(w), Some(h)) => Some((w as f64, h as f64)),
                    _ => Some((image.width_px as f64, image.height_px as f64)),
                };
                let fit = aspect_fit(
                    placement.width - 2.0 * pad,
                    opts.block_height - 2.0 * pad,
                    intrinsic,
                );
                surface.draw_image(
                    &image,
                    placement.x + pad + fit.dx,
                    cell_y + pad + fit.dy,
                    fit.width,
                    fit.height,
                )?;
            }
            Err(e) => {
                warn!(label = %photo.label, error = %e, "photo degraded to placeholder");
                outcome.placeholders += 1;
                outcome
                    .warnings
                    .push(format!("foto '{}': {e}", photo.label));
                draw_placeholder(surface, placement.x, cell_y, placement.width, opts)?;
            }
        }
    }

    flow.finish_row();
    Ok(outcome)
}

fn draw_label_chip<S: RenderSurface>(
    surface: &mut S,
    photo: &PhotoRecord,
    x: f64,
    y: f64,
    width: f64,
    opts: &PhotoGridOptions,
) -> Result<(), SurfaceError> {
    surface.draw_rect(
        x,
        y,
        width,
        opts.label_height,
        &RectStyle::filled(Color::gray(0.88)),
    )?;
    surface.draw_text(
        x + 3.0,
        y + opts.label_height - 4.0,
        &truncate(&photo.label, opts.label_chars),
        &TextStyle::bold(8.0),
    )
}

fn draw_placeholder<S: RenderSurface>(
    surface: &mut S,
    x: f64,
    y: f64,
    width: f64,
    opts: &PhotoGridOptions,
) -> Result<(), SurfaceError> {
    const MESSAGE: &str = "Imagem indisponível";
    let style = TextStyle {
        color: Color::gray(0.45),
        ..TextStyle::sized(9.0)
    };
    let text_width = surface.measure_text(MESSAGE, &style)?;
    surface.draw_text(
        x + (width - text_width) / 2.0,
        y + opts.block_height / 2.0,
        MESSAGE,
        &style,
    )
}
