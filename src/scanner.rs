// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Directory discovery
//!
//! Finds candidate files in a directory (non-recursive), applies the skip
//! rules, and builds one immutable `FileRecord` per file.

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::extract::PreviewExtractor;
use crate::Result;

/// Extensions eligible for renaming. Anything else is skipped during
/// discovery and never reaches the naming engine.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    ".docx", ".doc", ".xlsx", ".xls", ".csv", ".pdf", ".jpg", ".jpeg", ".png", ".gif",
];

/// Maximum content preview length in characters.
pub const PREVIEW_LIMIT: usize = 4000;

/// Immutable view of one candidate file.
#[derive(Debug, Clone, Serialize)]
pub struct FileRecord {
    /// Path to the file as discovered.
    pub source_path: PathBuf,
    /// Basename including extension.
    pub filename: String,
    /// Lowercased extension including the leading dot.
    pub extension: String,
    /// Extracted text preview or a textual placeholder, at most
    /// [`PREVIEW_LIMIT`] characters. May be empty.
    pub content_preview: String,
}

impl FileRecord {
    /// Build a record for a file, extracting its content preview.
    pub fn new(path: &Path, extractor: &dyn PreviewExtractor) -> Self {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        let extension = extension_of(path);
        let preview = extractor.extract(path);
        let content_preview = truncate_chars(&preview, PREVIEW_LIMIT);

        Self {
            source_path: path.to_path_buf(),
            filename,
            extension,
            content_preview,
        }
    }
}

/// Lowercased extension with leading dot, or empty for none.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default()
}

/// Check whether a file's extension is supported.
pub fn is_supported(path: &Path) -> bool {
    let ext = extension_of(path);
    SUPPORTED_EXTENSIONS.contains(&ext.as_str())
}

/// Check whether a file should be offered for renaming at all.
///
/// Hidden files, temporary download artifacts, OS metadata files, and the
/// tool's own config and history files are skipped.
pub fn should_process(path: &Path, extra_skip: &[String]) -> bool {
    let filename = match path.file_name().and_then(|n| n.to_str()) {
        Some(n) => n,
        None => return false,
    };

    if filename.starts_with('.') {
        return false;
    }

    let temp_extensions = [".tmp", ".part", ".crdownload", ".partial", ".download"];
    if temp_extensions.iter().any(|ext| filename.ends_with(ext)) {
        return false;
    }

    let skip_names = ["desktop.ini", "thumbs.db", "onomast.json", "onomast_history.jsonl"];
    if skip_names.iter().any(|n| filename.eq_ignore_ascii_case(n)) {
        return false;
    }

    if extra_skip.iter().any(|n| filename.eq_ignore_ascii_case(n)) {
        return false;
    }

    true
}

/// Scan a directory for candidate files, in stable name order.
///
/// Subdirectories are not descended into. Unsupported extensions and
/// skipped names are filtered out here, before the naming engine ever
/// sees them.
pub fn scan_directory(
    dir: &Path,
    extractor: &dyn PreviewExtractor,
    extra_skip: &[String],
) -> Result<Vec<FileRecord>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| p.is_file())
        .collect();

    // Stable batch order so collision suffixes are reproducible
    paths.sort();

    let mut records = Vec::new();
    for path in paths {
        if !is_supported(&path) {
            debug!("Skipping unsupported file type: {:?}", path);
            continue;
        }
        if !should_process(&path, extra_skip) {
            debug!("Skipping file: {:?}", path);
            continue;
        }
        records.push(FileRecord::new(&path, extractor));
    }

    Ok(records)
}

/// Truncate a string to at most `limit` characters on a char boundary.
pub fn truncate_chars(s: &str, limit: usize) -> String {
    if s.chars().count() <= limit {
        s.to_string()
    } else {
        s.chars().take(limit).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    struct StubExtractor;

    impl PreviewExtractor for StubExtractor {
        fn extract(&self, path: &Path) -> String {
            format!("preview of {}", path.file_name().unwrap().to_string_lossy())
        }
    }

    #[test]
    fn test_scan_filters_unsupported_and_hidden() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("report.pdf"), b"x").unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        fs::write(dir.path().join(".env"), b"x").unwrap();
        fs::write(dir.path().join("onomast_history.jsonl"), b"x").unwrap();
        fs::create_dir(dir.path().join("subdir")).unwrap();

        let records = scan_directory(dir.path(), &StubExtractor, &[]).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].filename, "report.pdf");
        assert_eq!(records[0].extension, ".pdf");
        assert_eq!(records[0].content_preview, "preview of report.pdf");
    }

    #[test]
    fn test_scan_order_is_stable() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.pdf"), b"x").unwrap();
        fs::write(dir.path().join("a.pdf"), b"x").unwrap();
        fs::write(dir.path().join("c.pdf"), b"x").unwrap();

        let records = scan_directory(dir.path(), &StubExtractor, &[]).unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.filename.as_str()).collect();
        assert_eq!(names, ["a.pdf", "b.pdf", "c.pdf"]);
    }

    #[test]
    fn test_extension_lowercased() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("SCAN.PDF");
        fs::write(&path, b"x").unwrap();

        assert!(is_supported(&path));
        assert_eq!(extension_of(&path), ".pdf");
    }

    #[test]
    fn test_extra_skip_names() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("keepme.pdf"), b"x").unwrap();
        fs::write(dir.path().join("skipme.pdf"), b"x").unwrap();

        let records =
            scan_directory(dir.path(), &StubExtractor, &["skipme.pdf".to_string()]).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].filename, "keepme.pdf");
    }

    #[test]
    fn test_truncate_chars_respects_boundaries() {
        assert_eq!(truncate_chars("héllo", 3), "hél");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }
}
