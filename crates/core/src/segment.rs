//! Splitting flat extracted text into slides.
//!
//! Text is split on explicit `Slide N` markers when present, and on wide
//! paragraph gaps otherwise. Each segment then gets a `Title:` line and a
//! formatted body.

use crate::format::ContentFormatter;
use regex::Regex;
use std::sync::LazyLock;

/// Default limit for a first line to be promoted to a title.
pub const DEFAULT_TITLE_MAX_LEN: usize = 100;

/// Default number of consecutive newlines that separate slides without markers.
pub const DEFAULT_GAP_NEWLINES: usize = 3;

/// Title used when nothing could be segmented from non-empty input.
pub const FALLBACK_TITLE: &str = "Extracted Content";

/// Matches "Slide 3", "slide12", "[SLIDE 4]".
static SLIDE_MARKER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\[?\bslide\s*\d+\]?").unwrap());

/// Segmenter settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmenterConfig {
    /// First lines at or above this many characters stay in the body.
    pub title_max_len: usize,
    /// Minimum newline run treated as a slide break when no markers exist.
    pub gap_newlines: usize,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            title_max_len: DEFAULT_TITLE_MAX_LEN,
            gap_newlines: DEFAULT_GAP_NEWLINES,
        }
    }
}

/// Splits extracted text into annotated slide texts.
#[derive(Debug, Clone)]
pub struct SlideSegmenter {
    config: SegmenterConfig,
    gap_regex: Regex,
    formatter: ContentFormatter,
}

impl Default for SlideSegmenter {
    fn default() -> Self {
        Self::new(SegmenterConfig::default())
    }
}

impl SlideSegmenter {
    pub fn new(config: SegmenterConfig) -> Self {
        let gap = config.gap_newlines.max(1);
        let gap_regex = Regex::new(&format!(r"\n{{{},}}", gap)).expect("gap pattern is valid");
        Self {
            config,
            gap_regex,
            formatter: ContentFormatter::new(),
        }
    }

    /// Use a specific formatter for segment bodies.
    pub fn with_formatter(mut self, formatter: ContentFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    /// Trimmed, non-empty raw segments before title and bullet processing.
    ///
    /// Markers are removed. If the marker split yields at most one piece,
    /// the original text is split on paragraph gaps instead.
    pub fn split_raw(&self, text: &str) -> Vec<String> {
        let text = normalize_line_endings(text);

        let mut pieces: Vec<&str> = SLIDE_MARKER_REGEX.split(&text).collect();
        if pieces.len() <= 1 {
            pieces = self.gap_regex.split(&text).collect();
        } else {
            log::debug!("Segmenting on {} slide markers", pieces.len() - 1);
        }

        pieces
            .into_iter()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Annotated slide texts: a `Title:` line followed by the formatted body.
    ///
    /// Non-blank input always yields at least one segment.
    pub fn segment(&self, text: &str) -> Vec<String> {
        let segments: Vec<String> = self
            .split_raw(text)
            .iter()
            .enumerate()
            .map(|(idx, raw)| self.annotate(raw, idx + 1))
            .collect();

        if segments.is_empty() && !text.trim().is_empty() {
            log::debug!("No segments found, keeping input as a single slide");
            let body = self.formatter.format_for_storage(&normalize_line_endings(text));
            return vec![join_title(FALLBACK_TITLE, &body)];
        }

        segments
    }

    fn annotate(&self, raw: &str, ordinal: usize) -> String {
        let (first, rest) = raw.split_once('\n').unwrap_or((raw, ""));
        let first = first.trim();

        let (title, body) = if first.chars().count() < self.config.title_max_len {
            (first.to_string(), rest.trim())
        } else {
            (format!("Slide {}", ordinal), raw)
        };

        join_title(&title, &self.formatter.format_for_storage(body))
    }
}

fn join_title(title: &str, body: &str) -> String {
    if body.is_empty() {
        format!("Title: {}", title)
    } else {
        format!("Title: {}\n{}", title, body)
    }
}

/// Convert `\r\n` and lone `\r` to `\n`.
pub fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Segment with the default settings.
pub fn segment(text: &str) -> Vec<String> {
    SlideSegmenter::default().segment(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_on_markers() {
        let segmenter = SlideSegmenter::default();
        assert_eq!(
            segmenter.split_raw("Slide 1\nHello\n\nSlide 2\nWorld"),
            vec!["Hello", "World"]
        );
    }

    #[test]
    fn test_segment_on_markers_promotes_titles() {
        assert_eq!(
            segment("Slide 1\nHello\n\nSlide 2\nWorld"),
            vec!["Title: Hello", "Title: World"]
        );
    }

    #[test]
    fn test_split_on_bracketed_markers_any_case() {
        let segmenter = SlideSegmenter::default();
        let text = "[SLIDE 12]\nIntro\nslide3 Body text\n[Slide 7] Close";
        assert_eq!(segmenter.split_raw(text), vec!["Intro", "Body text", "Close"]);
    }

    #[test]
    fn test_marker_count_matches_segments() {
        let segmenter = SlideSegmenter::default();
        let text = "Slide 5\nFive\nSlide 2\nTwo\nSlide 9\nNine\nSlide 1\nOne";
        assert_eq!(segmenter.split_raw(text).len(), 4);
    }

    #[test]
    fn test_marker_requires_word_boundary() {
        let segmenter = SlideSegmenter::default();
        assert_eq!(segmenter.split_raw("landslide 3 warning"), vec!["landslide 3 warning"]);
    }

    #[test]
    fn test_split_on_gaps_without_markers() {
        let segmenter = SlideSegmenter::default();
        assert_eq!(segmenter.split_raw("A\n\n\n\nB\n\n\n\nC"), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_two_newlines_do_not_split() {
        let segmenter = SlideSegmenter::default();
        assert_eq!(segmenter.split_raw("A\n\nB"), vec!["A\n\nB"]);
    }

    #[test]
    fn test_crlf_input() {
        let segmenter = SlideSegmenter::default();
        assert_eq!(segmenter.split_raw("A\r\n\r\n\r\nB"), vec!["A", "B"]);
    }

    #[test]
    fn test_segment_formats_body() {
        let segments = segment("Slide 1\nAgenda\nKickoff\nBudget\nHiring");
        assert_eq!(segments, vec!["Title: Agenda\nKickoff\n• Budget\n• Hiring"]);
    }

    #[test]
    fn test_long_first_line_synthesizes_title() {
        let long = "word ".repeat(30);
        let text = format!("Slide 1\n{}\nnext", long.trim());
        let segments = segment(&text);
        assert_eq!(segments.len(), 1);
        assert!(segments[0].starts_with("Title: Slide 1\n"));
        assert!(segments[0].contains(long.trim()));
    }

    #[test]
    fn test_segment_whitespace_only_is_empty() {
        assert!(segment("   \n\n\n\n  ").is_empty());
        assert!(segment("").is_empty());
    }

    #[test]
    fn test_fallback_segment_for_marker_only_input() {
        let segments = segment("Slide 1\nSlide 2");
        assert_eq!(segments, vec!["Title: Extracted Content\nSlide 1\n• Slide 2"]);
    }

    #[test]
    fn test_segment_is_deterministic() {
        let text = "Slide 1\nIntro\nA\nB\nSlide 2\nOutro";
        assert_eq!(segment(text), segment(text));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        /// Marker-free body text: no digits, so "slide" inside it never forms a marker.
        fn body() -> impl Strategy<Value = String> {
            "[a-z]{1,8}( [a-z]{1,8}){0,4}"
        }

        fn marker() -> impl Strategy<Value = String> {
            (any::<u16>(), any::<bool>(), "(Slide|SLIDE|slide)", " {0,2}").prop_map(
                |(n, bracketed, word, pad)| {
                    if bracketed {
                        format!("[{}{}{}]", word, pad, n)
                    } else {
                        format!("{}{}{}", word, pad, n)
                    }
                },
            )
        }

        proptest! {
            #[test]
            fn prop_one_segment_per_marker(
                slides in prop::collection::vec((marker(), body()), 1..8),
            ) {
                let text = slides
                    .iter()
                    .map(|(m, b)| format!("{}\n{}", m, b))
                    .collect::<Vec<_>>()
                    .join("\n");

                prop_assert_eq!(SlideSegmenter::default().split_raw(&text).len(), slides.len());
                prop_assert_eq!(segment(&text).len(), slides.len());
            }

            #[test]
            fn prop_gap_count_is_upper_bound(text in "[a-z \n]{0,80}") {
                let gaps = Regex::new(r"\n{3,}").unwrap().find_iter(&text).count();
                let count = SlideSegmenter::default().split_raw(&text).len();
                prop_assert!(count <= gaps + 1, "{:?} gave {} segments for {} gaps", text, count, gaps);
            }

            #[test]
            fn prop_gaps_between_text_split_exactly(
                pieces in prop::collection::vec("[a-z]{1,10}", 1..6),
                width in 3usize..6,
            ) {
                let text = pieces.join("\n".repeat(width).as_str());
                prop_assert_eq!(SlideSegmenter::default().split_raw(&text), pieces);
            }
        }
    }
}
