//! Turning an uploaded file into a [`Presentation`].
//!
//! Word documents go through a [`RawTextReader`] and become one slide per
//! paragraph; reader failures are returned to the caller. Slide decks are
//! scanned for printable text and segmented; when that yields nothing the
//! deck gets a single notice slide instead of an error.

use crate::error::{Error, Result};
use crate::scanner::BinaryScanner;
use crate::segment::{normalize_line_endings, SlideSegmenter};
use crate::types::{strip_extension, DocumentFormat, Presentation, SourceKind};

/// Content of the slide substituted when a deck cannot be segmented.
pub const DECK_NOTICE: &str = "Title: Extraction Notice\n\
No readable text could be segmented from this slide deck.\n\n\
Binary PowerPoint parsing is best-effort. Upload the file to the backend for full extraction.";

/// Content of the slide used when a document reads as empty.
pub const EMPTY_DOCUMENT_NOTICE: &str = "Title: Extraction Notice\nNo text was found in this document.";

/// Reads plain text out of a structured document.
pub trait RawTextReader {
    fn extract_raw_text(&self, format: DocumentFormat, bytes: &[u8]) -> Result<String>;
}

impl<T: RawTextReader + ?Sized> RawTextReader for &T {
    fn extract_raw_text(&self, format: DocumentFormat, bytes: &[u8]) -> Result<String> {
        (**self).extract_raw_text(format, bytes)
    }
}

/// Intermediate text produced before slides are built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionResult {
    /// Flat document text, split into paragraphs later.
    Text(String),
    /// Annotated slide texts from the segmenter.
    SlideTexts(Vec<String>),
    /// The deck yielded no segments; a single [`DECK_NOTICE`] slide stands in.
    DeckNotice,
}

/// Dispatches files to the document reader or the deck scanner.
pub struct DocumentExtractor<R> {
    reader: R,
    scanner: BinaryScanner,
    segmenter: SlideSegmenter,
}

impl<R: RawTextReader> DocumentExtractor<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            scanner: BinaryScanner::default(),
            segmenter: SlideSegmenter::default(),
        }
    }

    pub fn with_scanner(mut self, scanner: BinaryScanner) -> Self {
        self.scanner = scanner;
        self
    }

    pub fn with_segmenter(mut self, segmenter: SlideSegmenter) -> Self {
        self.segmenter = segmenter;
        self
    }

    /// Read a file and extract it.
    ///
    /// The extension is checked before any bytes are read.
    #[cfg(feature = "fs")]
    pub async fn extract(&self, path: impl AsRef<std::path::Path>) -> Result<Presentation> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        DocumentFormat::from_file_name(file_name).map_err(Error::UnsupportedFormat)?;

        let bytes = tokio::fs::read(path).await?;
        log::debug!("Read {} bytes from {}", bytes.len(), path.display());

        self.extract_bytes(&bytes, file_name)
    }

    /// Extract already materialized file bytes.
    pub fn extract_bytes(&self, bytes: &[u8], file_name: &str) -> Result<Presentation> {
        let format = DocumentFormat::from_file_name(file_name).map_err(Error::UnsupportedFormat)?;
        let mut presentation = Presentation::new(strip_extension(file_name));

        match self.extract_raw(format, bytes)? {
            ExtractionResult::Text(text) => {
                let normalized = normalize_line_endings(&text);
                let paragraphs = normalized
                    .split("\n\n")
                    .map(str::trim)
                    .filter(|p| !p.is_empty());
                for (idx, paragraph) in paragraphs.enumerate() {
                    presentation.push_slide(format!("Slide {}", idx + 1), paragraph);
                }
                if presentation.slides.is_empty() {
                    log::warn!("'{}' contains no text", file_name);
                    presentation.push_slide("Slide 1", EMPTY_DOCUMENT_NOTICE);
                }
            }
            ExtractionResult::SlideTexts(texts) => {
                for text in texts {
                    let title = segment_title(&text).unwrap_or_else(|| {
                        format!("Slide {}", presentation.slides.len() + 1)
                    });
                    presentation.push_slide(title, text);
                }
            }
            ExtractionResult::DeckNotice => presentation.push_slide("Slide 1", DECK_NOTICE),
        }

        log::debug!(
            "Extracted {} slides from '{}' as {:?}",
            presentation.slides.len(),
            file_name,
            format
        );
        Ok(presentation)
    }

    /// Produce text for one format without building slides.
    pub fn extract_raw(&self, format: DocumentFormat, bytes: &[u8]) -> Result<ExtractionResult> {
        match format.kind() {
            SourceKind::StructuredDocument => {
                let text = self.reader.extract_raw_text(format, bytes).map_err(|e| match e {
                    Error::StructuredParseFailure(_) => e,
                    other => Error::StructuredParseFailure(other.to_string()),
                })?;
                Ok(ExtractionResult::Text(text))
            }
            SourceKind::SlideDeck => Ok(self.deck_slide_texts(bytes)),
        }
    }

    fn deck_slide_texts(&self, bytes: &[u8]) -> ExtractionResult {
        let text = self.scanner.scan(bytes);
        let slides = self.segmenter.segment(&text);
        if slides.is_empty() {
            log::warn!(
                "No slides segmented from {} bytes of deck data, substituting notice slide",
                bytes.len()
            );
            return ExtractionResult::DeckNotice;
        }
        ExtractionResult::SlideTexts(slides)
    }
}

/// The text of the leading `Title:` annotation.
fn segment_title(text: &str) -> Option<String> {
    text.lines()
        .next()
        .and_then(|line| line.strip_prefix("Title:"))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}
