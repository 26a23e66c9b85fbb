//! Watermark and footer finishing pass.
//!
//! Runs after all sections are laid out, once the true page count is
//! known: every page gets a large rotated low-opacity watermark, a
//! divider above the footer band, the generation timestamp on the left
//! and "Página N de M" on the right.

use chrono::{DateTime, Utc};

use crate::error::SurfaceError;
use crate::model::PageLayoutConfig;
use crate::surface::{Color, RectStyle, RenderSurface, TextStyle};

const WATERMARK_OPACITY: f64 = 0.1;
const WATERMARK_FONT_SIZE: f64 = 64.0;
const FOOTER_FONT_SIZE: f64 = 8.0;

pub fn stamp<S: RenderSurface>(
    surface: &mut S,
    config: &PageLayoutConfig,
    watermark_text: &str,
    generated_at: DateTime<Utc>,
) -> Result<(), SurfaceError> {
    let total = surface.page_count();
    let stamp_line = format!("Gerado em {}", generated_at.format("%d/%m/%Y %H:%M UTC"));

    let watermark_style = TextStyle {
        font_size: WATERMARK_FONT_SIZE,
        bold: true,
        color: Color::gray(0.5),
        opacity: WATERMARK_OPACITY,
        rotate_degrees: 45.0,
    };
    let footer_style = TextStyle {
        color: Color::gray(0.35),
        ..TextStyle::sized(FOOTER_FONT_SIZE)
    };

    for index in 0..total {
        surface.switch_page(index)?;

        // Rotated around its origin, so start at the page center offset
        // along the 45° baseline to keep the text visually centered.
        let text_width = surface.measure_text(watermark_text, &watermark_style)?;
        let half = text_width / 2.0 * std::f64::consts::FRAC_1_SQRT_2;
        surface.draw_text(
            config.page_width / 2.0 - half,
            config.page_height / 2.0 + half,
            watermark_text,
            &watermark_style,
        )?;

        let divider_y = config.content_bottom() + 6.0;
        surface.draw_rect(
            config.margin,
            divider_y,
            config.content_width(),
            0.0,
            &RectStyle::stroked(Color::gray(0.6), 0.5),
        )?;

        let footer_y = divider_y + 12.0;
        surface.draw_text(config.margin, footer_y, &stamp_line, &footer_style)?;

        let page_line = format!("Página {} de {}", index + 1, total);
        let page_line_width = surface.measure_text(&page_line, &footer_style)?;
        surface.draw_text(
            config.page_width - config.margin - page_line_width,
            footer_y,
            &page_line,
            &footer_style,
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawOp, RecordingSurface, RenderSurface};
    use chrono::TimeZone;

    #[test]
    fn every_page_gets_watermark_and_footer() {
        let config = PageLayoutConfig::default();
        let mut surface = RecordingSurface::new();
        for _ in 0..3 {
            surface.create_page().unwrap();
        }
        let when = Utc.with_ymd_and_hms(2026, 8, 30, 14, 0, 0).unwrap();
        stamp(&mut surface, &config, "VISTORIA", when).unwrap();

        for (i, page) in surface.pages().iter().enumerate() {
            let texts: Vec<&DrawOp> = page.iter().collect();
            assert!(
                texts.iter().any(|op| matches!(
                    op,
                    DrawOp::Text { text, style, .. }
                        if text == "VISTORIA" && style.rotate_degrees == 45.0 && style.opacity == 0.1
                )),
                "page {i} missing watermark"
            );
            let expected = format!("Página {} de 3", i + 1);
            assert!(
                texts.iter().any(|op| matches!(
                    op,
                    DrawOp::Text { text, .. } if *text == expected
                )),
                "page {i} missing page counter"
            );
            assert!(texts.iter().any(|op| matches!(
                op,
                DrawOp::Text { text, .. } if text.starts_with("Gerado em 30/08/2026")
            )));
        }
    }

    #[test]
    fn footer_lands_inside_the_reserved_band() {
        let config = PageLayoutConfig::default();
        let mut surface = RecordingSurface::new();
        surface.create_page().unwrap();
        stamp(&mut surface, &config, "VISTORIA", Utc::now()).unwrap();

        for op in surface.page(0) {
            if let DrawOp::Text { y, text, .. } = op {
                if text.starts_with("Página") || text.starts_with("Gerado") {
                    assert!(*y > config.content_bottom());
                    assert!(*y < config.page_height);
                }
            }
        }
    }
}
