//! Annotated slide text.
//!
//! Slide content is plain text with a light convention on top:
//!
//! ```text
//! Title: Quarterly Review
//! Revenue is up this quarter.
//! • North region
//! • South region
//! ```
//!
//! A `Title:`, `Heading:` or `Header:` line (any case) is a heading, a line
//! starting with a bullet glyph is a list item, and everything else is prose.
//! [`ContentFormatter::format_for_storage`] infers bullets for raw text and
//! [`ContentFormatter::render_for_display`] classifies annotated text into
//! [`Block`]s.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Default character limit for lines considered list items.
pub const DEFAULT_LINE_MAX_LEN: usize = 100;

/// Marker prepended to inferred list items.
pub const BULLET_MARKER: &str = "• ";

/// Characters that start a list item.
pub const BULLET_GLYPHS: &[char] = &['•', '-', '*'];

/// Matches heading annotations and captures the heading text.
static HEADING_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:title|heading|header):(.*)$").unwrap());

/// Matches lines that are already enumerated ("1. ", "a. ").
static ENUMERATED_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[a-zA-Z0-9]+\.\s+").unwrap());

/// Collapses three or more newlines into a single blank line.
static EXCESS_NEWLINES_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// A structural element of rendered slide content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Block {
    Heading(String),
    List(Vec<String>),
    Paragraph(String),
}

impl Block {
    /// Serialize back to annotated text.
    pub fn to_annotated(&self) -> String {
        match self {
            Block::Heading(text) => format!("Title: {}", text),
            Block::List(items) => items
                .iter()
                .map(|item| format!("{}{}", BULLET_MARKER, item))
                .collect::<Vec<_>>()
                .join("\n"),
            Block::Paragraph(text) => text.clone(),
        }
    }
}

/// Serialize blocks back to annotated text, one block per line group.
pub fn blocks_to_annotated(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(Block::to_annotated)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Whether the line is a `Title:`/`Heading:`/`Header:` annotation.
pub fn is_heading_line(line: &str) -> bool {
    HEADING_REGEX.is_match(line.trim())
}

/// Whether the line starts with one of [`BULLET_GLYPHS`].
pub fn is_bullet_line(line: &str) -> bool {
    line.starts_with(BULLET_GLYPHS)
}

/// Classification of one non-empty line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum LineKind {
    Bullet(String),
    Other(Block),
}

fn classify(line: &str) -> LineKind {
    if let Some(caps) = HEADING_REGEX.captures(line) {
        let text = caps.get(1).map(|m| m.as_str().trim()).unwrap_or_default();
        return LineKind::Other(Block::Heading(text.to_string()));
    }

    let mut chars = line.chars();
    match chars.next() {
        Some(c) if BULLET_GLYPHS.contains(&c) => LineKind::Bullet(chars.as_str().trim().to_string()),
        _ => LineKind::Other(Block::Paragraph(line.to_string())),
    }
}

/// Whether the renderer is currently collecting list items.
#[derive(Debug, Default)]
enum ListState {
    #[default]
    OutsideList,
    InsideList(Vec<String>),
}

/// Single-pass renderer grouping adjacent bullets into lists.
#[derive(Debug, Default)]
struct Renderer {
    state: ListState,
    blocks: Vec<Block>,
}

impl Renderer {
    fn feed(&mut self, kind: LineKind) {
        self.state = match (std::mem::take(&mut self.state), kind) {
            (ListState::OutsideList, LineKind::Bullet(item)) => ListState::InsideList(vec![item]),
            (ListState::InsideList(mut items), LineKind::Bullet(item)) => {
                items.push(item);
                ListState::InsideList(items)
            }
            (ListState::OutsideList, LineKind::Other(block)) => {
                self.blocks.push(block);
                ListState::OutsideList
            }
            (ListState::InsideList(items), LineKind::Other(block)) => {
                self.blocks.push(Block::List(items));
                self.blocks.push(block);
                ListState::OutsideList
            }
        };
    }

    fn finish(mut self) -> Vec<Block> {
        if let ListState::InsideList(items) = self.state {
            self.blocks.push(Block::List(items));
        }
        self.blocks
    }
}

/// Formatter settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatterConfig {
    /// Lines at or above this many characters are prose, never list items.
    pub line_max_len: usize,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            line_max_len: DEFAULT_LINE_MAX_LEN,
        }
    }
}

/// Bullet inference and display classification for slide text.
#[derive(Debug, Clone, Default)]
pub struct ContentFormatter {
    config: FormatterConfig,
}

impl ContentFormatter {
    /// Create a formatter with the default line limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a formatter with a custom line limit.
    pub fn with_line_max_len(mut self, len: usize) -> Self {
        self.config.line_max_len = len;
        self
    }

    pub fn config(&self) -> FormatterConfig {
        self.config
    }

    /// Infer list items in a slide body.
    ///
    /// A line becomes a bullet when it directly follows another non-blank
    /// line, both are short, it is not already a bullet, and the previous
    /// line is neither a heading nor a bullet. The first line is never
    /// bulleted. Decisions read the original lines, so a run of short lines
    /// after a lead-in line is bulleted as a whole.
    pub fn format_for_storage(&self, body: &str) -> String {
        let collapsed = EXCESS_NEWLINES_REGEX.replace_all(body, "\n\n");
        let lines: Vec<&str> = collapsed.split('\n').collect();
        let max = self.config.line_max_len;

        lines
            .iter()
            .enumerate()
            .map(|(idx, &line)| {
                if idx == 0 {
                    return line.to_string();
                }
                let prev = lines[idx - 1];

                if ENUMERATED_REGEX.is_match(line) && prev.trim().is_empty() {
                    return line.to_string();
                }

                let promote = !line.trim().is_empty()
                    && !prev.trim().is_empty()
                    && !is_bullet_line(line)
                    && line.chars().count() < max
                    && prev.chars().count() < max
                    && !is_heading_line(prev)
                    && !is_bullet_line(prev);

                if promote {
                    format!("{}{}", BULLET_MARKER, line)
                } else {
                    line.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Classify annotated content into headings, lists and paragraphs.
    ///
    /// Blank lines are skipped and do not close an open list.
    pub fn render_for_display(&self, content: &str) -> Vec<Block> {
        let mut renderer = Renderer::default();
        for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
            renderer.feed(classify(line));
        }
        renderer.finish()
    }
}

/// Format a body with the default settings.
pub fn format_for_storage(body: &str) -> String {
    ContentFormatter::new().format_for_storage(body)
}

/// Render content with the default settings.
pub fn render_for_display(content: &str) -> Vec<Block> {
    ContentFormatter::new().render_for_display(content)
}
