//! Raw text readers for Word documents.
//!
//! DOCX files are ZIP archives holding `word/document.xml`; legacy DOC files
//! are OLE/CFB containers whose text is located through the piece table.
//! [`OfficeReader`] picks the right one from the container's magic bytes and
//! plugs into [`deck_core::DocumentExtractor`].

pub mod doc;
pub mod docx;
pub mod error;

pub use doc::DocReader;
pub use docx::DocxReader;
pub use error::{OfficeError, Result};

use deck_core::{DocumentFormat, RawTextReader};
use unicode_normalization::UnicodeNormalization;

/// Container types recognized from leading bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    /// ZIP archive (PK\x03\x04).
    Zip,
    /// OLE/CFB compound file (D0 CF 11 E0 A1 B1 1A E1).
    Cfb,
}

impl Container {
    /// Detect the container from file magic bytes.
    pub fn from_magic(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&[0x50, 0x4B, 0x03, 0x04]) {
            return Some(Self::Zip);
        }
        if bytes.starts_with(&[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1]) {
            return Some(Self::Cfb);
        }
        None
    }
}

/// Reads DOC and DOCX files, whichever container the bytes turn out to be.
#[derive(Debug, Clone, Default)]
pub struct OfficeReader {
    docx: DocxReader,
    doc: DocReader,
}

impl OfficeReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract NFC-normalized text with paragraphs separated by blank lines.
    pub fn read_text(&self, bytes: &[u8]) -> Result<String> {
        let text = match Container::from_magic(bytes) {
            Some(Container::Zip) => {
                log::debug!("Reading as DOCX");
                self.docx.read_text(bytes)?
            }
            Some(Container::Cfb) => {
                log::debug!("Reading as legacy DOC");
                self.doc.read_text(bytes)?
            }
            None => {
                return Err(OfficeError::Corrupted(
                    "not a ZIP or OLE/CFB container".to_string(),
                ))
            }
        };
        Ok(text.nfc().collect())
    }
}

impl RawTextReader for OfficeReader {
    fn extract_raw_text(&self, format: DocumentFormat, bytes: &[u8]) -> deck_core::Result<String> {
        let container = Container::from_magic(bytes);
        let expected = match format {
            DocumentFormat::Docx => Some(Container::Zip),
            DocumentFormat::Doc => Some(Container::Cfb),
            _ => None,
        };
        if container.is_some() && container != expected {
            log::warn!(
                "File declared as .{} has a {:?} container, reading it as such",
                format.extension(),
                container
            );
        }
        Ok(self.read_text(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_from_magic() {
        assert_eq!(Container::from_magic(b"PK\x03\x04rest"), Some(Container::Zip));
        assert_eq!(
            Container::from_magic(&[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1, 0x00]),
            Some(Container::Cfb)
        );
        assert_eq!(Container::from_magic(b"PK"), None);
        assert_eq!(Container::from_magic(b"plain text"), None);
    }

    #[test]
    fn test_unknown_container_is_parse_failure() {
        let reader = OfficeReader::new();
        let err = reader
            .extract_raw_text(DocumentFormat::Docx, b"just some text")
            .unwrap_err();
        assert!(matches!(err, deck_core::Error::StructuredParseFailure(_)));
    }

    #[test]
    fn test_docx_text_is_nfc_normalized() {
        let bytes = docx::tests::build_docx(&["Cafe\u{301}"]);
        let text = OfficeReader::new().read_text(&bytes).unwrap();
        assert_eq!(text, "Caf\u{e9}");
    }
}
