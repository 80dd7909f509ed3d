//! Error types for Word document reading.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, OfficeError>;

/// Errors that can occur while reading text from a Word document.
#[derive(Error, Debug)]
pub enum OfficeError {
    /// ZIP archive error (for DOCX).
    #[error("ZIP error: {0}")]
    Zip(String),

    /// XML parsing error (for DOCX).
    #[error("XML parsing error: {0}")]
    Xml(String),

    /// OLE/CFB container error (for DOC).
    #[error("OLE/CFB error: {0}")]
    Cfb(String),

    /// The document is encrypted and cannot be read.
    #[error("Document is encrypted")]
    Encrypted,

    /// Invalid or corrupted file.
    #[error("Invalid or corrupted file: {0}")]
    Corrupted(String),
}

impl From<OfficeError> for deck_core::Error {
    fn from(err: OfficeError) -> Self {
        deck_core::Error::StructuredParseFailure(err.to_string())
    }
}
