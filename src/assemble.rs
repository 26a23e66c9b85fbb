//! # Report Assembly
//!
//! The orchestrator: builds the ordered section list from the report
//! data, runs each renderer in sequence threading one [`PageFlow`], then
//! runs the watermark pass and saves the document.
//!
//! Section order: vehicle table → inspection table → notes → photo grid
//! → activity sections. A section whose backing data is empty is elided
//! entirely — no header, no reserved space.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::error::ReportError;
use crate::image_loader::PhotoFetcher;
use crate::layout::PageFlow;
use crate::model::{GenerationSummary, PageLayoutConfig, ReportData};
use crate::render::photos::{render_photo_grid, PhotoGridOptions};
use crate::render::table::{render_key_value_table, TableOptions};
use crate::render::{render_notes_block, render_paragraph, render_section_header};
use crate::surface::RenderSurface;
use crate::watermark;

/// Vertical breathing room between sections.
const SECTION_GAP: f64 = 8.0;

/// Knobs for one generation run. The defaults match the production
/// document; tests inject `generated_at` for deterministic footers.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub watermark_text: String,
    /// Footer timestamp. `None` means "now".
    pub generated_at: Option<DateTime<Utc>>,
    pub photo_grid: PhotoGridOptions,
    pub activity_grid: PhotoGridOptions,
    pub table: TableOptions,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            watermark_text: "VISTORIA".to_string(),
            generated_at: None,
            photo_grid: PhotoGridOptions::default(),
            activity_grid: PhotoGridOptions::activity(),
            table: TableOptions::default(),
        }
    }
}

/// Generate the full report document onto `surface`.
///
/// Completes with best-effort placeholders for failed photos, or fails
/// outright on a surface error — never a silently truncated document.
pub async fn generate_report<S: RenderSurface>(
    data: &ReportData,
    config: &PageLayoutConfig,
    fetcher: &PhotoFetcher,
    surface: &mut S,
    opts: &ReportOptions,
) -> Result<GenerationSummary, ReportError> {
    let generated_at = opts.generated_at.unwrap_or_else(Utc::now);
    info!(
        plate = data.plate.as_deref().unwrap_or("?"),
        photos = data.photos.len(),
        activities = data.activities.len(),
        "generating inspection report"
    );

    let mut warnings = Vec::new();
    let mut placeholder_count = 0usize;

    surface.create_page()?;
    let mut flow = PageFlow::new(config);

    // Vehicle facts.
    let vehicle_rows = [
        ("Placa", field(&data.plate, "placa", &mut warnings)),
        ("Modelo", field(&data.model, "modelo", &mut warnings)),
        ("Ano", field(&data.year, "ano", &mut warnings)),
        ("Status", field(&data.status, "status", &mut warnings)),
    ];
    render_key_value_table(&mut flow, surface, "Dados do Veículo", &vehicle_rows, &opts.table)?;
    flow.advance(SECTION_GAP);

    // Inspection facts.
    let created = data
        .created_at
        .map(|t| t.format("%d/%m/%Y %H:%M").to_string());
    let inspection_rows = [
        ("Tipo", field(&data.inspection_kind, "tipo", &mut warnings)),
        ("Responsável", field(&data.author, "responsável", &mut warnings)),
        ("Data de criação", field(&created, "data de criação", &mut warnings)),
    ];
    render_key_value_table(
        &mut flow,
        surface,
        "Dados da Vistoria",
        &inspection_rows,
        &opts.table,
    )?;
    flow.advance(SECTION_GAP);

    if let Some(notes) = data.notes.as_deref().filter(|n| !n.trim().is_empty()) {
        render_notes_block(&mut flow, surface, "Observações", notes)?;
        flow.advance(SECTION_GAP);
    }

    if !data.photos.is_empty() {
        render_section_header(&mut flow, surface, "Fotos da Vistoria")?;
        let outcome =
            render_photo_grid(&mut flow, surface, &data.photos, fetcher, &opts.photo_grid).await?;
        placeholder_count += outcome.placeholders;
        warnings.extend(outcome.warnings);
        flow.advance(SECTION_GAP);
    }

    for activity in &data.activities {
        let title = format!(
            "{} — {}",
            activity.kind.label(),
            activity.created_at.format("%d/%m/%Y %H:%M")
        );
        render_section_header(&mut flow, surface, &title)?;
        if let Some(notes) = activity.notes.as_deref().filter(|n| !n.trim().is_empty()) {
            render_paragraph(&mut flow, surface, notes)?;
        }
        if !activity.photos.is_empty() {
            let outcome = render_photo_grid(
                &mut flow,
                surface,
                &activity.photos,
                fetcher,
                &opts.activity_grid,
            )
            .await?;
            placeholder_count += outcome.placeholders;
            warnings.extend(outcome.warnings);
        }
        flow.advance(SECTION_GAP);
    }

    watermark::stamp(surface, config, &opts.watermark_text, generated_at)?;

    let file_name = output_file_name(data, generated_at, surface.file_extension());
    surface.save(&file_name)?;

    let summary = GenerationSummary {
        file_name,
        page_count: surface.page_count(),
        placeholder_count,
        warnings,
    };
    info!(
        pages = summary.page_count,
        placeholders = summary.placeholder_count,
        file = %summary.file_name,
        "report generated"
    );
    Ok(summary)
}

/// `Vistoria_{plate}_{ISO-date}.{ext}`, with the plate reduced to
/// filename-safe characters.
fn output_file_name(data: &ReportData, generated_at: DateTime<Utc>, ext: &str) -> String {
    let plate = data
        .plate
        .as_deref()
        .map(sanitize_plate)
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| "SEM-PLACA".to_string());
    format!("Vistoria_{}_{}.{}", plate, generated_at.format("%Y-%m-%d"), ext)
}

fn sanitize_plate(plate: &str) -> String {
    plate
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect::<String>()
        .to_uppercase()
}

/// Metadata accessor with the "N/A" degradation: a missing field renders
/// as text and is logged, never an error.
fn field(value: &Option<String>, name: &str, warnings: &mut Vec<String>) -> String {
    match value.as_deref().filter(|v| !v.trim().is_empty()) {
        Some(v) => v.to_string(),
        None => {
            warn!(field = name, "missing report field, rendering N/A");
            warnings.push(format!("campo '{name}' ausente"));
            "N/A".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_uses_sanitized_plate_and_iso_date() {
        use chrono::TimeZone;
        let data = ReportData {
            plate: Some("abc-1d23 ".to_string()),
            ..Default::default()
        };
        let when = Utc.with_ymd_and_hms(2026, 8, 30, 10, 0, 0).unwrap();
        assert_eq!(
            output_file_name(&data, when, "pdf"),
            "Vistoria_ABC-1D23_2026-08-30.pdf"
        );
    }

    #[test]
    fn file_name_without_plate_falls_back() {
        use chrono::TimeZone;
        let when = Utc.with_ymd_and_hms(2026, 1, 2, 0, 0, 0).unwrap();
        assert_eq!(
            output_file_name(&ReportData::default(), when, "json"),
            "Vistoria_SEM-PLACA_2026-01-02.json"
        );
    }

    #[test]
    fn missing_field_degrades_to_na_and_warns() {
        let mut warnings = Vec::new();
        assert_eq!(field(&None, "placa", &mut warnings), "N/A");
        assert_eq!(field(&Some("  ".to_string()), "modelo", &mut warnings), "N/A");
        assert_eq!(field(&Some("Gol".to_string()), "modelo", &mut warnings), "Gol");
        assert_eq!(warnings.len(), 2);
    }
}
