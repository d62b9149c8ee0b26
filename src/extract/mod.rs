// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Content preview extraction
//!
//! One extractor per supported format, all behind the [`PreviewExtractor`]
//! capability so the orchestrator can be tested with a deterministic
//! substitute. Extraction never fails past this boundary: any problem
//! degrades to a textual placeholder describing the file.

use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::{OnomastError, Result};

/// Capability: produce a text preview for a file.
pub trait PreviewExtractor: Send + Sync {
    /// Extract a preview, or a placeholder on any failure. Never errors.
    fn extract(&self, path: &Path) -> String;
}

/// Default extractor backed by real parsers for each supported format.
pub struct ContentExtractor;

impl PreviewExtractor for ContentExtractor {
    fn extract(&self, path: &Path) -> String {
        let basename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        let ext = crate::scanner::extension_of(path);

        let result = match ext.as_str() {
            ".docx" => extract_docx(path),
            ".doc" => Err(OnomastError::Extraction(
                "legacy .doc format has no parser".to_string(),
            )),
            ".pdf" => extract_pdf(path),
            ".xlsx" | ".xls" => extract_spreadsheet(path),
            ".csv" => extract_csv(path),
            ".jpg" | ".jpeg" | ".png" | ".gif" => extract_image(path),
            _ => Err(OnomastError::Extraction(format!(
                "no extractor for {}",
                ext
            ))),
        };

        match result {
            Ok(text) => text,
            Err(e) => {
                debug!("Extraction failed for {:?}: {}", path, e);
                placeholder(&ext, &basename)
            }
        }
    }
}

/// The placeholder returned when content cannot be extracted.
fn placeholder(extension: &str, basename: &str) -> String {
    match extension {
        ".docx" | ".doc" => format!("Word document: {}", basename),
        ".pdf" => format!("PDF document: {}", basename),
        ".xlsx" | ".xls" | ".csv" => format!("Spreadsheet: {}", basename),
        ".jpg" | ".jpeg" | ".png" | ".gif" => format!("Image: {}", basename),
        _ => format!("File: {}", basename),
    }
}

/// Pull the visible text out of a DOCX (`word/document.xml` inside the
/// ZIP container).
fn extract_docx(path: &Path) -> Result<String> {
    use quick_xml::events::Event;
    use quick_xml::Reader;

    let file = std::fs::File::open(path)?;
    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| OnomastError::Extraction(format!("Failed to open DOCX: {}", e)))?;

    let mut document_xml = archive
        .by_name("word/document.xml")
        .map_err(|_| OnomastError::Extraction("No document.xml found".to_string()))?;

    let mut xml = String::new();
    document_xml.read_to_string(&mut xml)?;

    let mut reader = Reader::from_str(&xml);
    let mut text = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"w:t" => in_text = true,
            Ok(Event::End(ref e)) if e.name().as_ref() == b"w:t" => {
                in_text = false;
                text.push(' ');
            }
            Ok(Event::Text(t)) if in_text => {
                text.push_str(&t.unescape().unwrap_or_default());
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(OnomastError::Extraction(format!(
                    "DOCX parse error: {}",
                    e
                )))
            }
            _ => {}
        }
    }

    Ok(text.trim().to_string())
}

/// Extract PDF text, prefixed with title/author metadata when present.
fn extract_pdf(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;

    let mut preview = String::new();
    if let Ok(doc) = lopdf::Document::load_mem(&bytes) {
        if let Some((title, author)) = pdf_info(&doc) {
            if !title.is_empty() {
                preview.push_str(&format!("Title: {}\n", title));
            }
            if !author.is_empty() {
                preview.push_str(&format!("Author: {}\n", author));
            }
        }
    }

    let text = pdf_extract::extract_text_from_mem(&bytes)
        .map_err(|e| OnomastError::Extraction(format!("PDF text extraction failed: {}", e)))?;
    preview.push_str(&text);

    Ok(preview)
}

/// Title and author from the PDF Info dictionary, if any.
fn pdf_info(doc: &lopdf::Document) -> Option<(String, String)> {
    let info = doc.trailer.get(b"Info").ok()?;
    let info_ref = info.as_reference().ok()?;
    let info_dict = doc.get_dictionary(info_ref).ok()?;

    let field = |key: &[u8]| {
        info_dict
            .get(key)
            .ok()
            .and_then(|v| v.as_str().ok())
            .map(|bytes| String::from_utf8_lossy(bytes).to_string())
            .unwrap_or_default()
    };

    Some((field(b"Title"), field(b"Author")))
}

/// Sheet names plus the first rows of the first sheet.
fn extract_spreadsheet(path: &Path) -> Result<String> {
    use calamine::{open_workbook_auto, Reader};

    let mut workbook = open_workbook_auto(path)
        .map_err(|e| OnomastError::Extraction(format!("Failed to open spreadsheet: {}", e)))?;

    let mut text = String::new();
    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    text.push_str(&format!("Sheets: {}\n", sheet_names.join(", ")));

    if let Some(sheet_name) = sheet_names.first() {
        if let Ok(range) = workbook.worksheet_range(sheet_name) {
            for (i, row) in range.rows().enumerate() {
                if i >= 20 {
                    text.push_str("...\n");
                    break;
                }
                let row_text: Vec<String> = row.iter().map(|c| c.to_string()).collect();
                text.push_str(&row_text.join("\t"));
                text.push('\n');
            }
        }
    }

    Ok(text)
}

/// First lines of a CSV file as plain text.
fn extract_csv(path: &Path) -> Result<String> {
    let content = std::fs::read_to_string(path)?;
    let head: Vec<&str> = content.lines().take(20).collect();
    Ok(head.join("\n"))
}

/// Images have no text; report their dimensions instead.
fn extract_image(path: &Path) -> Result<String> {
    let basename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    let (width, height) = image::image_dimensions(path)
        .map_err(|e| OnomastError::Extraction(format!("Failed to read image: {}", e)))?;
    Ok(format!("Image {}x{}: {}", width, height, basename))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_unreadable_pdf_degrades_to_placeholder() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.pdf");
        fs::write(&path, b"not a pdf").unwrap();

        let preview = ContentExtractor.extract(&path);
        assert_eq!(preview, "PDF document: broken.pdf");
    }

    #[test]
    fn test_legacy_doc_gets_placeholder() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("old.doc");
        fs::write(&path, b"\xd0\xcf\x11\xe0").unwrap();

        let preview = ContentExtractor.extract(&path);
        assert_eq!(preview, "Word document: old.doc");
    }

    #[test]
    fn test_garbage_image_gets_placeholder() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("photo.jpg");
        fs::write(&path, b"not an image").unwrap();

        let preview = ContentExtractor.extract(&path);
        assert_eq!(preview, "Image: photo.jpg");
    }

    #[test]
    fn test_csv_head_extracted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(&path, "a,b,c\n1,2,3\n").unwrap();

        let preview = ContentExtractor.extract(&path);
        assert_eq!(preview, "a,b,c\n1,2,3");
    }

    #[test]
    fn test_unknown_extension_placeholder() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mystery.bin");
        fs::write(&path, b"x").unwrap();

        let preview = ContentExtractor.extract(&path);
        assert_eq!(preview, "File: mystery.bin");
    }
}
