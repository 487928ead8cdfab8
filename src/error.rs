// src/error.rs
//! Unified error type for all engine operations.

use thiserror::Error;

/// The main error enum for all high-level operations within the engine.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The renderer rejected the configuration. The message is already
    /// clarified when the known spacing/size pattern was recognized.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Any other failure raised by the handwriting renderer, verbatim.
    #[error("Rendering failed: {0}")]
    Render(String),

    /// The renderer completed without cancellation but produced no pages.
    #[error("Rendering produced no output")]
    EmptyResult,

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to decode document: {0}")]
    Decode(String),

    #[error("Export failed: {0}")]
    Export(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PipelineError {
    /// Maps a raw renderer failure onto the error taxonomy.
    ///
    /// The one pathological configuration the external renderer is known to
    /// reject (line spacing not exceeding the font size) surfaces as an
    /// opaque message naming `font.size` and `line_spacing`; when that
    /// pattern is recognized the message is replaced with an actionable
    /// diagnostic. Everything else is forwarded unchanged.
    pub fn from_renderer(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.contains("font.size") && message.contains("line_spacing") {
            PipelineError::InvalidConfiguration(
                "line spacing must be greater than the font size; \
                 increase the line spacing (at least 1.5x the font size is recommended) \
                 or reduce the font size"
                    .to_string(),
            )
        } else {
            PipelineError::Render(message)
        }
    }
}
