//! Error types for the tablescan library.

use thiserror::Error;

/// Primary error type for table detection and extraction.
///
/// Internal geometry anomalies never surface here; they are normalized or
/// dropped where they occur. These variants cover the external collaborator
/// contracts (rasterization, text suppression) and output serialization.
#[derive(Error, Debug)]
pub enum Error {
    #[error("page rasterization failed: {0}")]
    Rasterization(String),

    #[error("text suppression failed: {0}")]
    TextSuppression(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience Result type alias for tablescan operations.
pub type Result<T> = std::result::Result<T, Error>;
