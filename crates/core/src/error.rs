//! Error types for slide extraction and enhancement.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while extracting, storing or enhancing slides.
///
/// Heuristic misses inside the extraction pipeline are not errors: the
/// slide-deck path degrades to a diagnostic slide instead.
#[derive(Error, Debug)]
pub enum Error {
    /// The file extension is not one of doc, docx, ppt or pptx.
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Failed to materialize the file bytes.
    #[error("Failed to read file: {0}")]
    ReadFailure(#[from] std::io::Error),

    /// The structured document reader rejected a declared document.
    #[error("Failed to parse document: {0}")]
    StructuredParseFailure(String),

    /// An enhancement, upload or health request failed.
    #[error("{0}")]
    RemoteCallFailure(String),

    /// No API key is configured for the direct AI provider.
    #[error("OpenAI API key is not set. Please set it in the settings.")]
    MissingApiKey,

    /// An enhancement option is out of range or unknown.
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    /// The presentation store could not be read or written.
    #[error("Storage error: {0}")]
    Storage(String),

    /// A presentation or slide lookup failed.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Storage(err.to_string())
    }
}
