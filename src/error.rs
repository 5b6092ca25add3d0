//! Error types for the link-resolution pipeline.
//!
//! Top-level operations return `anyhow::Result`. These enums type the
//! failures that are absorbed inside a resolution call so callers and tests
//! can still see why a candidate or a payload contributed nothing.

use thiserror::Error;

/// Why a single mirror candidate produced no media.
#[derive(Error, Debug)]
pub enum CandidateError {
    #[error("mirror payload is not valid base64 text: {0}")]
    Decode(String),

    #[error("decoded mirror fragment has no iframe src")]
    MissingFrame,

    #[error("player page fetch failed: {0}")]
    Fetch(String),

    #[error("player page has no payload script")]
    MissingBlob,

    #[error("no external extractor handles {0}")]
    NoExtractor(String),

    #[error("external extractor '{name}' failed: {message}")]
    External { name: String, message: String },
}

/// Why a quasi-JSON segment could not be decoded.
#[derive(Error, Debug)]
pub enum RepairError {
    #[error("marker '{0}' not found")]
    MarkerNotFound(&'static str),

    #[error("repaired segment is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}
