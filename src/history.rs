// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Rename journal with undo support

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::Result;

/// Default journal filename, written next to the working directory.
pub const DEFAULT_HISTORY_FILE: &str = "onomast_history.jsonl";

/// A single executed rename.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub original_path: PathBuf,
    pub new_path: PathBuf,
    pub reason: String,
    pub undone: bool,
}

impl HistoryEntry {
    /// Create an entry for a rename that just happened.
    pub fn record(original_path: PathBuf, new_path: PathBuf, reason: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            original_path,
            new_path,
            reason,
            undone: false,
        }
    }
}

/// Append-only JSON-lines journal of renames.
pub struct History {
    path: PathBuf,
}

impl History {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Append an entry to the journal.
    pub fn append(&self, entry: &HistoryEntry) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let json = serde_json::to_string(entry)?;
        writeln!(file, "{}", json)?;

        Ok(())
    }

    /// Read all journal entries, oldest first. Unparsable lines are
    /// logged and skipped.
    pub fn read_all(&self) -> Result<Vec<HistoryEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);

        let mut entries = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(&line) {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    tracing::warn!("Failed to parse history entry: {}", e);
                }
            }
        }

        Ok(entries)
    }

    /// Get the most recent N entries (newest first).
    pub fn get_recent(&self, count: usize) -> Result<Vec<HistoryEntry>> {
        let mut entries = self.read_all()?;
        entries.reverse();
        entries.truncate(count);
        Ok(entries)
    }

    /// Mark an entry as undone.
    pub fn mark_undone(&self, id: &str) -> Result<()> {
        let entries = self.read_all()?;

        // Rewrite the entire file with the updated entry
        let file = File::create(&self.path)?;
        let mut writer = std::io::BufWriter::new(file);

        for mut entry in entries {
            if entry.id == id {
                entry.undone = true;
            }
            let json = serde_json::to_string(&entry)?;
            writeln!(writer, "{}", json)?;
        }

        Ok(())
    }

    /// Get entries that haven't been undone.
    pub fn get_undoable(&self) -> Result<Vec<HistoryEntry>> {
        let entries = self.read_all()?;
        Ok(entries.into_iter().filter(|e| !e.undone).collect())
    }

    /// Clear all history.
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    /// Get history file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entry(tag: &str) -> HistoryEntry {
        HistoryEntry::record(
            PathBuf::from(format!("old_{}.pdf", tag)),
            PathBuf::from(format!("new_{}.pdf", tag)),
            "test".to_string(),
        )
    }

    #[test]
    fn test_append_and_read_round_trip() {
        let dir = TempDir::new().unwrap();
        let history = History::new(dir.path().join("journal.jsonl"));

        history.append(&entry("a")).unwrap();
        history.append(&entry("b")).unwrap();

        let entries = history.read_all().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].original_path, PathBuf::from("old_a.pdf"));
        assert!(!entries[0].undone);
    }

    #[test]
    fn test_recent_is_newest_first() {
        let dir = TempDir::new().unwrap();
        let history = History::new(dir.path().join("journal.jsonl"));

        history.append(&entry("a")).unwrap();
        history.append(&entry("b")).unwrap();
        history.append(&entry("c")).unwrap();

        let recent = history.get_recent(2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].original_path, PathBuf::from("old_c.pdf"));
        assert_eq!(recent[1].original_path, PathBuf::from("old_b.pdf"));
    }

    #[test]
    fn test_mark_undone_excludes_from_undoable() {
        let dir = TempDir::new().unwrap();
        let history = History::new(dir.path().join("journal.jsonl"));

        let e = entry("a");
        history.append(&e).unwrap();
        history.append(&entry("b")).unwrap();

        history.mark_undone(&e.id).unwrap();

        let undoable = history.get_undoable().unwrap();
        assert_eq!(undoable.len(), 1);
        assert_eq!(undoable[0].original_path, PathBuf::from("old_b.pdf"));

        let all = history.read_all().unwrap();
        assert!(all.iter().find(|x| x.id == e.id).unwrap().undone);
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let dir = TempDir::new().unwrap();
        let history = History::new(dir.path().join("absent.jsonl"));
        assert!(history.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_clear_removes_file() {
        let dir = TempDir::new().unwrap();
        let history = History::new(dir.path().join("journal.jsonl"));
        history.append(&entry("a")).unwrap();
        history.clear().unwrap();
        assert!(!history.path().exists());
    }
}
