//! # Report Data Model
//!
//! The input representation for the layout engine. A report aggregates
//! vehicle/inspection metadata, an ordered list of evidence photos, and an
//! ordered list of activity entries with their own nested photos. This is
//! designed to be easily produced by the host application's data-access
//! layer or direct JSON construction.
//!
//! All metadata fields are optional: a missing field renders as "N/A" and
//! is never a reason to fail generation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A complete inspection report ready for rendering.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportData {
    /// License plate, e.g. "ABC1D23". Also used in the output file name.
    pub plate: Option<String>,
    /// Vehicle model description.
    pub model: Option<String>,
    /// Model year.
    pub year: Option<String>,
    /// Inspection status (e.g. "approved", "pending").
    pub status: Option<String>,
    /// Inspection type (e.g. "full", "transfer").
    pub inspection_kind: Option<String>,
    /// Free-form inspector notes. An empty/absent value elides the
    /// notes section entirely.
    pub notes: Option<String>,
    /// Display name of the inspecting author.
    pub author: Option<String>,
    /// When the inspection was created.
    pub created_at: Option<DateTime<Utc>>,

    /// Evidence photos, in insertion order.
    #[serde(default)]
    pub photos: Vec<PhotoRecord>,

    /// Activity log entries, in insertion order.
    #[serde(default)]
    pub activities: Vec<ActivityRecord>,
}

/// One evidence photo.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoRecord {
    /// Short caption drawn above the image cell.
    pub label: String,
    /// Image source: HTTP(S) URL, data URI, file path, or raw base64.
    pub url: String,
    /// Explicit render position. Photos with an order render first,
    /// ascending; photos without keep insertion order after them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
    /// Intrinsic pixel width, when the producer already knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intrinsic_width: Option<u32>,
    /// Intrinsic pixel height.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intrinsic_height: Option<u32>,
}

/// An activity log entry: a guided or free inspection step with optional
/// notes and its own photo set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    pub kind: ActivityKind,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub photos: Vec<PhotoRecord>,
}

/// How an activity was captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    /// Free-form capture.
    Free,
    /// Guided step-by-step capture.
    Guided,
}

impl ActivityKind {
    /// Human-readable label used in activity section headers.
    pub fn label(&self) -> &'static str {
        match self {
            ActivityKind::Free => "Registro livre",
            ActivityKind::Guided => "Registro guiado",
        }
    }
}

/// Page geometry, immutable for the lifetime of one report.
///
/// All values are in points (1/72 inch). The content area is the page
/// minus `margin` on every side, with `footer_reserve` additionally kept
/// clear at the bottom for the watermark pass footer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageLayoutConfig {
    pub page_width: f64,
    pub page_height: f64,
    pub margin: f64,
    /// Fixed at 2. Kept explicit so the trace output is self-describing.
    #[serde(default = "default_columns")]
    pub column_count: u32,
    pub column_gap: f64,
    pub footer_reserve: f64,
}

fn default_columns() -> u32 {
    2
}

impl Default for PageLayoutConfig {
    fn default() -> Self {
        // A4 in points.
        Self {
            page_width: 595.28,
            page_height: 841.89,
            margin: 40.0,
            column_count: 2,
            column_gap: 10.0,
            footer_reserve: 30.0,
        }
    }
}

impl PageLayoutConfig {
    /// Width of the full content area (both columns plus the gap).
    pub fn content_width(&self) -> f64 {
        self.page_width - 2.0 * self.margin
    }

    /// Width of one column.
    pub fn column_width(&self) -> f64 {
        (self.content_width() - self.column_gap) / self.column_count as f64
    }

    /// Lowest y a placed block may reach.
    pub fn content_bottom(&self) -> f64 {
        self.page_height - self.margin - self.footer_reserve
    }

    /// Left edge of the given column (0 or 1).
    pub fn column_x(&self, column: u32) -> f64 {
        self.margin + column as f64 * (self.column_width() + self.column_gap)
    }
}

/// Outcome of a completed generation: the best-effort record of what was
/// produced and which photos degraded to placeholders.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationSummary {
    /// Name the document was saved under.
    pub file_name: String,
    pub page_count: usize,
    /// How many photo cells rendered as "image unavailable".
    pub placeholder_count: usize,
    /// One entry per non-fatal degradation (image failures, missing data).
    pub warnings: Vec<String>,
}

/// Photos in render order: explicit `order` ascending first, then the
/// rest in insertion order. The sort is stable, so ties and unordered
/// photos keep their relative input positions.
pub fn ordered_photos(photos: &[PhotoRecord]) -> Vec<&PhotoRecord> {
    let mut out: Vec<&PhotoRecord> = photos.iter().collect();
    out.sort_by_key(|p| p.order.unwrap_or(u32::MAX));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo(label: &str, order: Option<u32>) -> PhotoRecord {
        PhotoRecord {
            label: label.to_string(),
            url: String::new(),
            order,
            intrinsic_width: None,
            intrinsic_height: None,
        }
    }

    #[test]
    fn ordered_photos_respects_explicit_order() {
        let photos = vec![photo("b", Some(2)), photo("a", Some(1)), photo("c", Some(3))];
        let labels: Vec<_> = ordered_photos(&photos).iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, ["a", "b", "c"]);
    }

    #[test]
    fn ordered_photos_keeps_insertion_order_without_order_field() {
        let photos = vec![photo("x", None), photo("y", None), photo("z", None)];
        let labels: Vec<_> = ordered_photos(&photos).iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, ["x", "y", "z"]);
    }

    #[test]
    fn ordered_photos_mixed() {
        let photos = vec![photo("late", None), photo("first", Some(0)), photo("tail", None)];
        let labels: Vec<_> = ordered_photos(&photos).iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, ["first", "late", "tail"]);
    }

    #[test]
    fn default_config_geometry() {
        let cfg = PageLayoutConfig::default();
        assert_eq!(cfg.content_width(), 595.28 - 80.0);
        assert!((cfg.column_width() * 2.0 + cfg.column_gap - cfg.content_width()).abs() < 1e-9);
        assert_eq!(cfg.content_bottom(), 841.89 - 40.0 - 30.0);
        assert_eq!(cfg.column_x(0), 40.0);
        assert!(cfg.column_x(1) > cfg.column_x(0) + cfg.column_width());
    }

    #[test]
    fn report_data_parses_from_camel_case_json() {
        let json = r#"{
            "plate": "ABC1D23",
            "photos": [{ "label": "Frente", "url": "x", "intrinsicWidth": 800 }],
            "activities": [{ "kind": "guided", "createdAt": "2026-08-01T12:00:00Z", "photos": [] }]
        }"#;
        let data: ReportData = serde_json::from_str(json).unwrap();
        assert_eq!(data.plate.as_deref(), Some("ABC1D23"));
        assert_eq!(data.photos[0].intrinsic_width, Some(800));
        assert_eq!(data.activities[0].kind, ActivityKind::Guided);
    }
}
