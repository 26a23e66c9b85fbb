//! # Vistoria Report
//!
//! The pagination and layout engine behind vehicle inspection reports.
//!
//! Most report generators lay content on an infinitely tall canvas and
//! slice it into pages afterwards, then patch up whatever broke at the
//! slice points. This engine does the opposite: **the page is the
//! fundamental unit of layout.** Every block placement — photo cell,
//! table, section header — is decided against the page boundary as a
//! hard constraint, flowing through a two-column grid with explicit
//! page-break fallback.
//!
//! ## Architecture
//!
//! ```text
//! ReportData (JSON/API)
//!       ↓
//!   [assemble]  — section ordering, cursor threading
//!       ↓
//!   [layout]    — two-column page flow (reserve / overflow / break)
//!   [render]    — photo grid + key/value table renderers
//!   [fit]       — aspect-fit math for image cells
//!       ↓
//!   [watermark] — finishing pass: watermark + footers on every page
//!       ↓
//!   RenderSurface — host-supplied drawing primitives
//! ```
//!
//! Photo acquisition is the only latency-bound step; it is prefetched
//! with bounded concurrency while the commit loop stays strictly
//! sequential, so layout is deterministic for identical input.

pub mod assemble;
pub mod error;
pub mod fit;
pub mod image_loader;
pub mod layout;
pub mod model;
pub mod render;
pub mod surface;
pub mod watermark;

pub use assemble::{generate_report, ReportOptions};
pub use error::{ImageLoadError, ReportError, SurfaceError};
pub use image_loader::PhotoFetcher;
pub use model::{GenerationSummary, PageLayoutConfig, ReportData};
pub use surface::{RecordingSurface, RenderSurface};

/// Generate a report described as JSON onto the given surface, with
/// default page geometry, fetcher, and options.
///
/// This is the convenience entry point the host's "download report"
/// action calls; [`generate_report`] exposes every knob.
pub async fn generate_report_json<S: RenderSurface>(
    json: &str,
    surface: &mut S,
) -> Result<GenerationSummary, ReportError> {
    let data: ReportData = serde_json::from_str(json)?;
    generate_report(
        &data,
        &PageLayoutConfig::default(),
        &PhotoFetcher::default(),
        surface,
        &ReportOptions::default(),
    )
    .await
}
