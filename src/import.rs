// src/import.rs
//! Plain-text extraction from input documents.
//!
//! Supported formats: `.txt` (UTF-8, or UTF-16 via BOM), `.docx` (paragraph
//! text), `.pdf` (text layer). Legacy Office formats are refused with a
//! pointer to the converted formats rather than silently mangled.

use crate::error::PipelineError;
use docx_rs::DocumentChild;
use log::debug;
use std::fs;
use std::path::Path;

/// Extracts the text content of `path` according to its extension.
pub fn import_file(path: &Path) -> Result<String, PipelineError> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let text = match ext.as_str() {
        "txt" => read_text_file(path)?,
        "docx" => read_docx_file(path)?,
        "pdf" => read_pdf_file(path)?,
        "doc" | "xls" | "ppt" => {
            return Err(PipelineError::UnsupportedFormat(format!(
                "legacy Office format .{ext} is not supported; convert to .docx first"
            )));
        }
        other => {
            return Err(PipelineError::UnsupportedFormat(format!(
                ".{other} ({})",
                path.display()
            )));
        }
    };

    debug!(
        "[IMPORT] Extracted {} chars from {}",
        text.chars().count(),
        path.display()
    );
    Ok(text)
}

/// Reads a text file as UTF-8, falling back to UTF-16 when a BOM says so.
fn read_text_file(path: &Path) -> Result<String, PipelineError> {
    let bytes = fs::read(path)?;
    match bytes.as_slice() {
        [0xFF, 0xFE, rest @ ..] => decode_utf16(rest, u16::from_le_bytes, path),
        [0xFE, 0xFF, rest @ ..] => decode_utf16(rest, u16::from_be_bytes, path),
        _ => String::from_utf8(bytes).map_err(|_| {
            PipelineError::Decode(format!(
                "{} is not valid UTF-8 and carries no UTF-16 byte order mark",
                path.display()
            ))
        }),
    }
}

fn decode_utf16(
    bytes: &[u8],
    combine: fn([u8; 2]) -> u16,
    path: &Path,
) -> Result<String, PipelineError> {
    if bytes.len() % 2 != 0 {
        return Err(PipelineError::Decode(format!(
            "{} has a truncated UTF-16 code unit",
            path.display()
        )));
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| combine([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units)
        .map_err(|_| PipelineError::Decode(format!("{} is not valid UTF-16", path.display())))
}

/// Joins the non-empty paragraphs of a Word document with newlines.
fn read_docx_file(path: &Path) -> Result<String, PipelineError> {
    let bytes = fs::read(path)?;
    let docx = docx_rs::read_docx(&bytes)
        .map_err(|e| PipelineError::Decode(format!("{}: {e}", path.display())))?;

    let mut paragraphs = Vec::new();
    for child in &docx.document.children {
        if let DocumentChild::Paragraph(paragraph) = child {
            let text = paragraph.raw_text();
            if !text.trim().is_empty() {
                paragraphs.push(text);
            }
        }
    }
    Ok(paragraphs.join("\n"))
}

fn read_pdf_file(path: &Path) -> Result<String, PipelineError> {
    let text = pdf_extract::extract_text(path)
        .map_err(|e| PipelineError::Decode(format!("{}: {e}", path.display())))?;
    // Drop blank lines the extractor emits between text runs.
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .collect();
    Ok(lines.join("\n"))
}
