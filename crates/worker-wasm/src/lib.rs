//! WASM-compatible wrapper for slide extraction.
//!
//! Exposes document extraction, segmentation and slide content formatting
//! to JavaScript. Everything runs on in-memory bytes; no filesystem access.

use deck_core::{ContentFormatter, DocumentExtractor, DocumentFormat, Slide, SlideSegmenter};
use deck_office::OfficeReader;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    // Set up better panic messages in the console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Result of extracting one uploaded file.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub id: String,
    /// File name without its extension.
    pub name: String,
    /// Lowercase extension the format was chosen from.
    pub format: String,
    pub slides: Vec<Slide>,
}

/// Extract slides from a .ppt, .pptx, .doc or .docx file.
///
/// # Arguments
/// * `data` - The raw bytes of the file
/// * `filename` - The original filename (used for format detection and naming)
///
/// # Returns
/// A JavaScript object with the extraction result, or throws on error.
#[wasm_bindgen]
pub fn extract_presentation(data: &[u8], filename: &str) -> Result<JsValue, JsValue> {
    let result = extract_presentation_impl(data, filename).map_err(|e| JsValue::from_str(&e))?;

    serde_wasm_bindgen::to_value(&result)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

fn extract_presentation_impl(data: &[u8], filename: &str) -> Result<ExtractionResult, String> {
    let format = DocumentFormat::from_file_name(filename)
        .map_err(|ext| format!("Unsupported file type: .{}", ext))?;

    let extractor = DocumentExtractor::new(OfficeReader::new());
    let presentation = extractor
        .extract_bytes(data, filename)
        .map_err(|e| e.to_string())?;

    Ok(ExtractionResult {
        id: presentation.id,
        name: presentation.name,
        format: format.extension().to_string(),
        slides: presentation.slides,
    })
}

/// Turn annotated slide text into display blocks.
///
/// Each block is `{ "kind": "heading" | "list" | "paragraph", "value": ... }`,
/// where `value` is a string, or an array of strings for lists.
#[wasm_bindgen]
pub fn render_content(content: &str) -> Result<JsValue, JsValue> {
    let blocks = ContentFormatter::new().render_for_display(content);
    serde_wasm_bindgen::to_value(&blocks)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Annotate a slide body before it is stored.
#[wasm_bindgen]
pub fn format_for_storage(body: &str) -> String {
    ContentFormatter::new().format_for_storage(body)
}

/// Split flat text into annotated slide texts.
#[wasm_bindgen]
pub fn segment_text(text: &str) -> Result<JsValue, JsValue> {
    let segments = segment_text_impl(text);
    serde_wasm_bindgen::to_value(&segments)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

fn segment_text_impl(text: &str) -> Vec<String> {
    SlideSegmenter::default().segment(text)
}
