//! Structured error types for the report engine.
//!
//! The taxonomy mirrors how failures actually behave during generation:
//! image problems are per-photo and non-fatal (the cell degrades to a
//! placeholder), surface problems are fatal and abort the whole run.
//! Missing metadata is not an error at all — it renders as "N/A".

use thiserror::Error;

/// Per-photo acquisition/decoding failure. Never aborts generation; the
/// affected cell is drawn as a placeholder and the failure is recorded in
/// the [`GenerationSummary`](crate::model::GenerationSummary).
#[derive(Debug, Error)]
pub enum ImageLoadError {
    #[error("failed to fetch '{url}': {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("fetch of '{url}' timed out after {seconds}s")]
    Timeout { url: String, seconds: u64 },

    #[error("failed to read image file '{path}': {message}")]
    File { path: String, message: String },

    #[error("base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("failed to decode image: {0}")]
    Decode(String),

    #[error("unsupported image format (expected JPEG, PNG or WebP)")]
    UnsupportedFormat,

    #[error("image data too short")]
    TooShort,
}

/// A drawing-primitive failure reported by the host's render surface.
/// Always fatal: generation aborts and the error bubbles to the caller,
/// so a truncated or corrupt document is never emitted.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("drawing context unavailable: {0}")]
    ContextUnavailable(String),

    #[error("draw operation failed: {0}")]
    Draw(String),

    #[error("failed to save document '{file_name}': {message}")]
    Save { file_name: String, message: String },
}

/// The unified error returned by [`generate_report`](crate::generate_report).
#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Surface(#[from] SurfaceError),

    /// JSON input failed to parse as a valid report (CLI path).
    #[error("failed to parse report data: {0}")]
    Parse(#[from] serde_json::Error),
}
