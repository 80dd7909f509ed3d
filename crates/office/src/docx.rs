//! DOCX (Office Open XML) text reader.

use crate::error::{OfficeError, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};
use zip::ZipArchive;

/// Path of the main document part inside the archive.
const DOCUMENT_PART: &str = "word/document.xml";

/// Reader for DOCX files.
#[derive(Debug, Clone, Default)]
pub struct DocxReader;

impl DocxReader {
    pub fn new() -> Self {
        Self
    }

    /// Extract body text, one paragraph per block separated by a blank line.
    pub fn read_text(&self, bytes: &[u8]) -> Result<String> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| OfficeError::Zip(format!("Failed to open ZIP: {}", e)))?;

        let xml = read_part(&mut archive, DOCUMENT_PART)?;
        let paragraphs = paragraphs_from_xml(&xml)?;
        log::debug!("DOCX body has {} paragraphs", paragraphs.len());

        Ok(paragraphs.join("\n\n"))
    }
}

/// Collect the text of every `w:p`, in document order.
fn paragraphs_from_xml(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);

    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_paragraph = false;
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match local_name(e.name().as_ref()) {
                b"p" => {
                    in_paragraph = true;
                    current.clear();
                }
                b"t" if in_paragraph => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(ref e)) if in_paragraph => match local_name(e.name().as_ref()) {
                b"tab" => current.push('\t'),
                b"br" | b"cr" => current.push('\n'),
                _ => {}
            },
            Ok(Event::Text(ref e)) if in_text => {
                let text = e
                    .unescape()
                    .map_err(|e| OfficeError::Xml(format!("Bad text content: {}", e)))?;
                current.push_str(&text);
            }
            Ok(Event::End(ref e)) => match local_name(e.name().as_ref()) {
                b"t" => in_text = false,
                b"p" => {
                    in_paragraph = false;
                    paragraphs.push(std::mem::take(&mut current));
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(OfficeError::Xml(format!(
                    "Error at position {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(paragraphs)
}

/// Read a file from the ZIP archive.
fn read_part(archive: &mut ZipArchive<Cursor<&[u8]>>, path: &str) -> Result<String> {
    let mut file = archive
        .by_name(path)
        .map_err(|e| OfficeError::Zip(format!("File not found in archive '{}': {}", path, e)))?;

    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|e| OfficeError::Zip(format!("Failed to read '{}': {}", path, e)))?;

    Ok(content)
}

/// Extract the local name from a potentially namespaced XML element name.
fn local_name(name: &[u8]) -> &[u8] {
    match name.iter().position(|&b| b == b':') {
        Some(pos) => &name[pos + 1..],
        None => name,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;

    /// Build a minimal DOCX with one `w:p` per entry.
    pub(crate) fn build_docx(paragraphs: &[&str]) -> Vec<u8> {
        let body: String = paragraphs
            .iter()
            .map(|p| format!("<w:p><w:r><w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>", p))
            .collect();
        let xml = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
             <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
             <w:body>{}</w:body></w:document>",
            body
        );
        build_archive(&[(DOCUMENT_PART, &xml)])
    }

    fn build_archive(parts: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in parts {
            writer
                .start_file(*name, zip::write::FileOptions::default())
                .unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_local_name() {
        assert_eq!(local_name(b"w:p"), b"p");
        assert_eq!(local_name(b"t"), b"t");
    }

    #[test]
    fn test_read_paragraphs() {
        let bytes = build_docx(&["Introduction", "Second &amp; last"]);
        let text = DocxReader::new().read_text(&bytes).unwrap();
        assert_eq!(text, "Introduction\n\nSecond & last");
    }

    #[test]
    fn test_runs_tabs_and_breaks() {
        let xml = "<w:document xmlns:w=\"x\"><w:body>\
                   <w:p><w:r><w:t>Hello</w:t></w:r><w:r><w:tab/><w:t xml:space=\"preserve\"> world</w:t></w:r></w:p>\
                   <w:p><w:r><w:t>line</w:t><w:br/><w:t>next</w:t></w:r></w:p>\
                   <w:p/>\
                   </w:body></w:document>";
        let paragraphs = paragraphs_from_xml(xml).unwrap();
        assert_eq!(paragraphs, vec!["Hello\t world", "line\nnext"]);
    }

    #[test]
    fn test_empty_paragraphs_are_kept() {
        let xml = "<w:body><w:p></w:p><w:p><w:r><w:t>x</w:t></w:r></w:p></w:body>";
        assert_eq!(paragraphs_from_xml(xml).unwrap(), vec!["", "x"]);
    }

    #[test]
    fn test_missing_document_part() {
        let bytes = build_archive(&[("word/styles.xml", "<w:styles/>")]);
        let err = DocxReader::new().read_text(&bytes).unwrap_err();
        assert!(matches!(err, OfficeError::Zip(_)));
    }

    #[test]
    fn test_not_a_zip() {
        let err = DocxReader::new().read_text(b"not a zip at all").unwrap_err();
        assert!(matches!(err, OfficeError::Zip(_)));
    }
}
