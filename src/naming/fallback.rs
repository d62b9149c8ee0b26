// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Deterministic fallback namer
//!
//! Builds a full naming suggestion from the existing filename alone, used
//! whenever the remote suggestion path is unavailable or unparsable.

use super::{date, form, keywords, NamingSuggestion};

/// Derive a naming suggestion from a filename and its extension.
///
/// With two or more keywords the first becomes the subject and keywords
/// two through four are capitalized and joined into a CamelCase
/// description. With fewer, the subject is the sole keyword (or "Misc")
/// and the description is "Document". The revision is always `Rev0`.
pub fn suggest(filename: &str, extension: &str) -> NamingSuggestion {
    let words = keywords::extract_keywords(filename);
    let date = date::extract_date(filename);

    let (subject, description) = if words.len() >= 2 {
        let end = words.len().min(4);
        let description: String = words[1..end].iter().map(|w| capitalize(w)).collect();
        (words[0].clone(), description)
    } else {
        let subject = words
            .first()
            .cloned()
            .unwrap_or_else(|| "Misc".to_string());
        (subject, "Document".to_string())
    };

    let document_form = form::classify(extension, &words).to_string();
    let reason = format!(
        "Derived from the filename: {} as subject, {} as description, {} as document form, {} as date.",
        subject, description, document_form, date
    );

    NamingSuggestion {
        subject,
        description,
        document_form,
        date,
        revision: "Rev0".to_string(),
        reason,
    }
}

/// Uppercase the first character and lowercase the rest.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.as_str().to_lowercase().chars()).collect(),
        None => String::new(),
    }
}
