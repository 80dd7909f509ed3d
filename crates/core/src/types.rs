//! Domain types for representing extracted presentation content.

use serde::{Deserialize, Serialize};

/// An uploaded document broken into slides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Presentation {
    /// Identifier derived from the creation timestamp (milliseconds).
    pub id: String,

    /// File name without its extension.
    pub name: String,

    /// Slides in presentation order.
    pub slides: Vec<Slide>,
}

impl Presentation {
    /// Create a new, empty presentation stamped with the current time.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(chrono::Utc::now().timestamp_millis().to_string(), name)
    }

    /// Create a new, empty presentation with an explicit identifier.
    pub fn with_id(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            slides: Vec::new(),
        }
    }

    /// Append a slide, numbering it after the existing ones.
    pub fn push_slide(&mut self, title: impl Into<String>, content: impl Into<String>) {
        let id = self.slides.len() + 1;
        self.slides.push(Slide::new(id, title, content));
    }

    /// Look up a slide by its id.
    pub fn slide(&self, slide_id: usize) -> Option<&Slide> {
        self.slides.iter().find(|s| s.id == slide_id)
    }

    /// Replace the content of one slide. Returns false when no slide has that id.
    pub fn replace_content(&mut self, slide_id: usize, content: impl Into<String>) -> bool {
        match self.slides.iter_mut().find(|s| s.id == slide_id) {
            Some(slide) => {
                slide.content = content.into();
                true
            }
            None => false,
        }
    }
}

/// A single slide. `content` is annotated text, see [`crate::format`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    /// 1-based id, assigned at creation and never renumbered.
    pub id: usize,

    /// Display title.
    pub title: String,

    /// Annotated slide text.
    pub content: String,
}

impl Slide {
    pub fn new(id: usize, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            content: content.into(),
        }
    }
}

/// The format of the source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    /// Legacy Word (OLE/CFB binary).
    Doc,
    /// Modern Word (Office Open XML).
    Docx,
    /// Legacy PowerPoint (OLE/CFB binary).
    Ppt,
    /// Modern PowerPoint (Office Open XML).
    Pptx,
}

/// How a format is turned into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Read with a structured text reader; failures are hard errors.
    StructuredDocument,
    /// Scanned for printable runs and segmented; failures degrade.
    SlideDeck,
}

impl DocumentFormat {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "doc" => Some(Self::Doc),
            "docx" => Some(Self::Docx),
            "ppt" => Some(Self::Ppt),
            "pptx" => Some(Self::Pptx),
            _ => None,
        }
    }

    /// Detect format from a file name, returning the rejected extension on failure.
    pub fn from_file_name(file_name: &str) -> std::result::Result<Self, String> {
        let ext = file_extension(file_name).unwrap_or_default();
        Self::from_extension(ext).ok_or_else(|| ext.to_string())
    }

    pub fn kind(&self) -> SourceKind {
        match self {
            Self::Doc | Self::Docx => SourceKind::StructuredDocument,
            Self::Ppt | Self::Pptx => SourceKind::SlideDeck,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Doc => "doc",
            Self::Docx => "docx",
            Self::Ppt => "ppt",
            Self::Pptx => "pptx",
        }
    }
}

/// The extension after the last dot, if any.
pub fn file_extension(file_name: &str) -> Option<&str> {
    file_name.rsplit_once('.').map(|(_, ext)| ext)
}

/// The file name with its last extension removed.
pub fn strip_extension(file_name: &str) -> &str {
    file_name
        .rsplit_once('.')
        .map(|(name, _)| name)
        .unwrap_or(file_name)
}
