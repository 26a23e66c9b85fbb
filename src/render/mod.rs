//! # Section Renderers
//!
//! Each renderer draws one logical report section by asking the
//! [`PageFlow`](crate::layout::PageFlow) where its blocks go and turning
//! the resulting placements into surface calls. Renderers never touch
//! the cursor directly and never draw outside their placements.

pub mod photos;
pub mod table;

use crate::error::SurfaceError;
use crate::layout::{PageFlow, Placement};
use crate::surface::{Color, RectStyle, RenderSurface, TextStyle};

/// Make sure the surface has pages up to `placement.page` and that the
/// placement's page is active.
pub(crate) fn ensure_page<S: RenderSurface>(
    surface: &mut S,
    placement: &Placement,
) -> Result<(), SurfaceError> {
    while surface.page_count() < placement.page {
        surface.create_page()?;
    }
    surface.switch_page(placement.page - 1)
}

/// Truncate to a character budget, appending an ellipsis. Char-based so
/// accented labels never split mid-codepoint.
pub(crate) fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

/// Greedy word wrap against the surface's own text metrics. Explicit
/// newlines are respected; a single word wider than the line gets a line
/// to itself.
pub(crate) fn wrap_text<S: RenderSurface>(
    surface: &mut S,
    text: &str,
    max_width: f64,
    style: &TextStyle,
) -> Result<Vec<String>, SurfaceError> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if surface.measure_text(&candidate, style)? <= max_width || current.is_empty() {
                current = candidate;
            } else {
                lines.push(current);
                current = word.to_string();
            }
        }
        lines.push(current);
    }
    Ok(lines)
}

/// Height of a section header line (including the rule under it).
pub(crate) const SECTION_HEADER_HEIGHT: f64 = 24.0;

/// Full-width section header: bold title with a rule under it, always
/// starting a fresh row.
pub(crate) fn render_section_header<S: RenderSurface>(
    flow: &mut PageFlow,
    surface: &mut S,
    title: &str,
) -> Result<(), SurfaceError> {
    let placement = flow.reserve_full_width(SECTION_HEADER_HEIGHT);
    ensure_page(surface, &placement)?;
    surface.draw_text(placement.x, placement.y + 13.0, title, &TextStyle::bold(12.0))?;
    surface.draw_rect(
        placement.x,
        placement.y + 17.0,
        placement.width,
        0.0,
        &RectStyle::stroked(Color::gray(0.3), 1.0),
    )?;
    Ok(())
}

/// Full-width wrapped paragraph, placed whole like a table.
pub(crate) fn render_paragraph<S: RenderSurface>(
    flow: &mut PageFlow,
    surface: &mut S,
    text: &str,
) -> Result<(), SurfaceError> {
    const LINE_HEIGHT: f64 = 12.0;
    let style = TextStyle::sized(9.0);

    let width = flow.config().content_width() - 4.0;
    let lines = wrap_text(surface, text, width, &style)?;

    let block_height = lines.len() as f64 * LINE_HEIGHT + 4.0;
    let placement = flow.reserve_full_width(block_height);
    ensure_page(surface, &placement)?;
    for (i, line) in lines.iter().enumerate() {
        surface.draw_text(
            placement.x + 2.0,
            placement.y + (i as f64 + 1.0) * LINE_HEIGHT,
            line,
            &style,
        )?;
    }
    Ok(())
}

/// Titled free-text block (inspector notes).
pub(crate) fn render_notes_block<S: RenderSurface>(
    flow: &mut PageFlow,
    surface: &mut S,
    title: &str,
    text: &str,
) -> Result<(), SurfaceError> {
    render_section_header(flow, surface, title)?;
    render_paragraph(flow, surface, text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;

    #[test]
    fn truncate_is_char_safe() {
        assert_eq!(truncate("curto", 10), "curto");
        assert_eq!(truncate("Suspensão dianteira", 10), "Suspensão…");
        assert_eq!(truncate("abcdef", 4), "abc…");
    }

    #[test]
    fn wrap_text_splits_on_width_and_newlines() {
        let mut surface = RecordingSurface::new();
        let style = TextStyle::sized(10.0);
        // RecordingSurface: 5pt per char. 50pt line = 10 chars.
        let lines = wrap_text(&mut surface, "um dois tres\nquatro", 50.0, &style).unwrap();
        assert_eq!(lines, ["um dois", "tres", "quatro"]);
    }

    #[test]
    fn wrap_text_overlong_word_gets_its_own_line() {
        let mut surface = RecordingSurface::new();
        let style = TextStyle::sized(10.0);
        let lines = wrap_text(&mut surface, "palavracomprida ok", 20.0, &style).unwrap();
        assert_eq!(lines, ["palavracomprida", "ok"]);
    }
}
