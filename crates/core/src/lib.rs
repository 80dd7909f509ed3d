//! Core slide types, document-to-slide segmentation, annotated content
//! formatting and enhancement history.

pub mod enhance;
pub mod error;
pub mod extract;
pub mod format;
pub mod history;
pub mod scanner;
pub mod segment;
pub mod store;
pub mod types;

pub use enhance::{EnhanceSettings, EnhancementOptions, EnhancementType};
pub use error::{Error, Result};
pub use extract::{DocumentExtractor, ExtractionResult, RawTextReader};
pub use format::{Block, ContentFormatter, FormatterConfig};
pub use history::EnhancementHistory;
pub use scanner::{BinaryScanner, ScannerConfig};
pub use segment::{SegmenterConfig, SlideSegmenter};
pub use store::{JsonFileStore, MemoryStore, PresentationStore};
pub use types::{DocumentFormat, Presentation, Slide, SourceKind};
