//! Legacy DOC (Word 97-2003, OLE/CFB) text reader.
//!
//! The main text of a Word binary document is stored in the `WordDocument`
//! stream as a sequence of pieces. The piece table (inside the CLX structure
//! of the `0Table` or `1Table` stream) maps character positions to stream
//! offsets, with each piece either 8-bit compressed or UTF-16LE.

use crate::error::{OfficeError, Result};
use cfb::CompoundFile;
use std::io::{Cursor, Read, Seek};

/// Magic number at the start of the FIB.
const FIB_IDENT: u16 = 0xA5EC;

/// Offsets into the File Information Block.
mod fib {
    pub const FLAGS: usize = 0x000A;
    pub const CCP_TEXT: usize = 0x004C;
    pub const FC_CLX: usize = 0x01A2;
    pub const LCB_CLX: usize = 0x01A6;

    pub const FLAG_ENCRYPTED: u16 = 0x0100;
    pub const FLAG_WHICH_TABLE: u16 = 0x0200;
}

/// Marks a piece stored as 8-bit characters.
const PIECE_COMPRESSED: u32 = 0x4000_0000;

/// Size of a piece descriptor in the PlcPcd.
const PCD_SIZE: usize = 8;

/// Reader for legacy DOC files.
#[derive(Debug, Clone, Default)]
pub struct DocReader;

impl DocReader {
    pub fn new() -> Self {
        Self
    }

    /// Extract the main document text, paragraphs separated by a blank line.
    pub fn read_text(&self, bytes: &[u8]) -> Result<String> {
        let mut cfb = CompoundFile::open(Cursor::new(bytes))
            .map_err(|e| OfficeError::Cfb(format!("Failed to open CFB container: {}", e)))?;

        let word = read_stream(&mut cfb, "/WordDocument")?;
        if word.len() < fib::LCB_CLX + 4 {
            return Err(OfficeError::Corrupted("WordDocument stream too small".to_string()));
        }
        if read_u16_le(&word, 0) != FIB_IDENT {
            return Err(OfficeError::Corrupted("Missing Word FIB signature".to_string()));
        }

        let flags = read_u16_le(&word, fib::FLAGS);
        if flags & fib::FLAG_ENCRYPTED != 0 {
            return Err(OfficeError::Encrypted);
        }

        let table_name = if flags & fib::FLAG_WHICH_TABLE != 0 {
            "/1Table"
        } else {
            "/0Table"
        };
        let table = read_stream(&mut cfb, table_name)?;

        let ccp_text = read_u32_le(&word, fib::CCP_TEXT) as usize;
        let fc_clx = read_u32_le(&word, fib::FC_CLX) as usize;
        let lcb_clx = read_u32_le(&word, fib::LCB_CLX) as usize;
        let clx = table
            .get(fc_clx..fc_clx.saturating_add(lcb_clx))
            .ok_or_else(|| OfficeError::Corrupted("CLX lies outside the table stream".to_string()))?;

        let pieces = parse_piece_table(clx)?;
        log::debug!("DOC has {} pieces, {} main text characters", pieces.len(), ccp_text);

        let raw = collect_text(&word, &pieces, ccp_text)?;
        Ok(clean_text(&raw))
    }
}

/// One entry of the piece table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Piece {
    cp_start: usize,
    cp_end: usize,
    fc: u32,
}

impl Piece {
    fn is_compressed(&self) -> bool {
        self.fc & PIECE_COMPRESSED != 0
    }

    /// Byte offset of the piece's text in the WordDocument stream.
    fn offset(&self) -> usize {
        if self.is_compressed() {
            ((self.fc & !PIECE_COMPRESSED) / 2) as usize
        } else {
            self.fc as usize
        }
    }
}

/// Skip the Prc entries and decode the Pcdt.
fn parse_piece_table(clx: &[u8]) -> Result<Vec<Piece>> {
    let mut pos = 0;

    // Prc entries: 0x01, cbGrpprl (u16), grpprl
    while clx.get(pos) == Some(&0x01) {
        if pos + 3 > clx.len() {
            return Err(OfficeError::Corrupted("Truncated Prc in CLX".to_string()));
        }
        let cb = read_u16_le(clx, pos + 1) as usize;
        pos += 3 + cb;
    }

    if clx.get(pos) != Some(&0x02) {
        return Err(OfficeError::Corrupted("Missing Pcdt in CLX".to_string()));
    }
    if pos + 5 > clx.len() {
        return Err(OfficeError::Corrupted("Truncated Pcdt header".to_string()));
    }
    let lcb = read_u32_le(clx, pos + 1) as usize;
    let plc = clx
        .get(pos + 5..pos + 5 + lcb)
        .ok_or_else(|| OfficeError::Corrupted("PlcPcd runs past CLX".to_string()))?;

    // (n + 1) CPs of 4 bytes followed by n descriptors of 8 bytes.
    if plc.len() < 4 || (plc.len() - 4) % (4 + PCD_SIZE) != 0 {
        return Err(OfficeError::Corrupted(format!("Bad PlcPcd length {}", plc.len())));
    }
    let count = (plc.len() - 4) / (4 + PCD_SIZE);
    let pcd_base = 4 * (count + 1);

    let pieces = (0..count)
        .map(|i| Piece {
            cp_start: read_u32_le(plc, 4 * i) as usize,
            cp_end: read_u32_le(plc, 4 * (i + 1)) as usize,
            fc: read_u32_le(plc, pcd_base + PCD_SIZE * i + 2),
        })
        .collect();

    Ok(pieces)
}

/// Decode pieces in order until `limit` characters have been read.
fn collect_text(word: &[u8], pieces: &[Piece], limit: usize) -> Result<String> {
    let mut text = String::new();
    let mut remaining = limit;

    for piece in pieces {
        if remaining == 0 {
            break;
        }
        let chars = piece.cp_end.saturating_sub(piece.cp_start).min(remaining);
        let start = piece.offset();

        if piece.is_compressed() {
            let bytes = word
                .get(start..start + chars)
                .ok_or_else(|| OfficeError::Corrupted("Piece runs past stream".to_string()))?;
            text.extend(bytes.iter().map(|&b| decode_compressed(b)));
        } else {
            let bytes = word
                .get(start..start + chars * 2)
                .ok_or_else(|| OfficeError::Corrupted("Piece runs past stream".to_string()))?;
            let units: Vec<u16> = bytes
                .chunks_exact(2)
                .map(|c| u16::from_le_bytes([c[0], c[1]]))
                .collect();
            text.push_str(&String::from_utf16_lossy(&units));
        }

        remaining -= chars;
    }

    Ok(text)
}

/// Compressed pieces are Windows-1252; map the C1 range that differs from Latin-1.
fn decode_compressed(b: u8) -> char {
    match b {
        0x82 => '\u{201A}',
        0x84 => '\u{201E}',
        0x85 => '\u{2026}',
        0x91 => '\u{2018}',
        0x92 => '\u{2019}',
        0x93 => '\u{201C}',
        0x94 => '\u{201D}',
        0x95 => '\u{2022}',
        0x96 => '\u{2013}',
        0x97 => '\u{2014}',
        0x99 => '\u{2122}',
        _ => b as char,
    }
}

/// Turn Word control characters into plain text.
///
/// Paragraph, cell and page marks become blank lines, manual line breaks
/// become newlines, and field instructions are dropped in favour of their
/// displayed result.
fn clean_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut field_depth = 0usize;
    let mut in_instruction = false;

    for c in raw.chars() {
        match c {
            '\u{13}' => {
                field_depth += 1;
                in_instruction = true;
            }
            '\u{14}' => in_instruction = false,
            '\u{15}' => {
                field_depth = field_depth.saturating_sub(1);
                in_instruction = false;
            }
            _ if in_instruction && field_depth > 0 => {}
            '\r' | '\u{07}' | '\u{0C}' => out.push_str("\n\n"),
            '\u{0B}' => out.push('\n'),
            '\u{1E}' => out.push('-'),
            '\t' => out.push('\t'),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }

    out
}

/// Read a whole stream from the compound file.
fn read_stream<R: Read + Seek>(cfb: &mut CompoundFile<R>, path: &str) -> Result<Vec<u8>> {
    let mut stream = cfb
        .open_stream(path)
        .map_err(|e| OfficeError::Cfb(format!("Missing '{}' stream: {}", path, e)))?;

    let mut data = Vec::new();
    stream
        .read_to_end(&mut data)
        .map_err(|e| OfficeError::Cfb(format!("Failed to read '{}': {}", path, e)))?;

    Ok(data)
}

fn read_u16_le(data: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([data[offset], data[offset + 1]])
}

fn read_u32_le(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}
