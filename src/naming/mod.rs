// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! The naming-decision engine
//!
//! Everything that turns a filename into a convention-compliant new name:
//! date extraction, keyword extraction, document-form classification, the
//! deterministic fallback namer, and collision resolution. This module is
//! the single source of truth for the convention; both the CLI and the web
//! front end go through it.

pub mod collision;
pub mod date;
pub mod fallback;
pub mod form;
pub mod keywords;

use serde::{Deserialize, Serialize};

/// A structured naming suggestion, from Claude or the local fallback.
///
/// Field names mirror the JSON contract of the remote service
/// (`document_form`, `reasoning`) so a parsed response deserializes
/// directly into this type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamingSuggestion {
    /// Subject or activity, e.g. "Project"
    pub subject: String,
    /// CamelCase-joined description, e.g. "RiskManagement"
    pub description: String,
    /// 3-letter document form code, e.g. "RPT"
    pub document_form: String,
    /// Date as exactly 8 digits, `YYYYMMDD`
    pub date: String,
    /// "Rev0" for finalized documents, a letter for drafts
    pub revision: String,
    /// Free-text justification, for display only
    #[serde(rename = "reasoning")]
    pub reason: String,
}

impl NamingSuggestion {
    /// Compose the convention filename.
    ///
    /// `extension` is carried over verbatim, including the leading dot.
    pub fn compose(&self, extension: &str) -> String {
        format!(
            "{}_{}_{}_{}_{}{}",
            self.subject, self.description, self.document_form, self.date, self.revision, extension
        )
    }

    /// Structural sanity check on a suggestion.
    ///
    /// Used to reject remote responses that parsed as JSON but do not fit
    /// the convention (empty subject, malformed date, missing revision).
    pub fn is_well_formed(&self) -> bool {
        !self.subject.trim().is_empty()
            && !self.description.trim().is_empty()
            && !self.document_form.trim().is_empty()
            && self.date.len() == 8
            && self.date.chars().all(|c| c.is_ascii_digit())
            && !self.revision.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suggestion() -> NamingSuggestion {
        NamingSuggestion {
            subject: "Project".to_string(),
            description: "RiskManagement".to_string(),
            document_form: "GUI".to_string(),
            date: "20150414".to_string(),
            revision: "Rev0".to_string(),
            reason: "test".to_string(),
        }
    }

    #[test]
    fn test_compose_follows_convention() {
        assert_eq!(
            suggestion().compose(".pdf"),
            "Project_RiskManagement_GUI_20150414_Rev0.pdf"
        );
    }

    #[test]
    fn test_compose_preserves_extension_case() {
        assert_eq!(
            suggestion().compose(".PDF"),
            "Project_RiskManagement_GUI_20150414_Rev0.PDF"
        );
    }

    #[test]
    fn test_well_formed_accepts_valid() {
        assert!(suggestion().is_well_formed());
    }

    #[test]
    fn test_well_formed_rejects_bad_date() {
        let mut s = suggestion();
        s.date = "2015-04".to_string();
        assert!(!s.is_well_formed());

        s.date = "April2015".to_string();
        assert!(!s.is_well_formed());
    }

    #[test]
    fn test_well_formed_rejects_empty_subject() {
        let mut s = suggestion();
        s.subject = "  ".to_string();
        assert!(!s.is_well_formed());
    }
}
