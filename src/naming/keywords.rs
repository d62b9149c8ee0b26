// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Keyword extraction from filenames

/// Words dropped from keyword lists, compared case-insensitively.
const STOP_WORDS: [&str; 12] = [
    "the", "and", "or", "a", "an", "in", "on", "at", "to", "for", "with", "by",
];

/// Tokenize a filename into meaningful keywords.
///
/// The extension is stripped, the separators `_ + - .` become spaces, and
/// the result is split on whitespace. Stop words and purely numeric tokens
/// are dropped. Token order and case are preserved; case-folding happens
/// only for the stop-word comparison.
pub fn extract_keywords(filename: &str) -> Vec<String> {
    let stem = strip_extension(filename);

    let cleaned: String = stem
        .chars()
        .map(|c| if matches!(c, '_' | '+' | '-' | '.') { ' ' } else { c })
        .collect();

    cleaned
        .split_whitespace()
        .filter(|word| {
            let lower = word.to_lowercase();
            !STOP_WORDS.contains(&lower.as_str())
        })
        .filter(|word| !word.chars().all(|c| c.is_ascii_digit()))
        .map(str::to_string)
        .collect()
}

/// Drop the final extension, leaving dotfile names like `.env` intact.
fn strip_extension(filename: &str) -> &str {
    match filename.rfind('.') {
        Some(i) if i > 0 => &filename[..i],
        _ => filename,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separators_stop_words_and_digits() {
        assert_eq!(extract_keywords("The_Annual-Report+2024.pdf"), ["Annual", "Report"]);
    }

    #[test]
    fn test_case_preserved() {
        assert_eq!(
            extract_keywords("Budget_PLANNING_draft.xlsx"),
            ["Budget", "PLANNING", "draft"]
        );
    }

    #[test]
    fn test_stop_words_filtered_case_insensitively() {
        assert_eq!(extract_keywords("THE_meeting_AND_agenda.doc"), ["meeting", "agenda"]);
    }

    #[test]
    fn test_mixed_alphanumeric_tokens_kept() {
        // "Q3" contains a digit but is not purely numeric
        assert_eq!(extract_keywords("Q3_results_2024.csv"), ["Q3", "results"]);
    }

    #[test]
    fn test_all_tokens_filtered() {
        assert!(extract_keywords("2024_01_15.pdf").is_empty());
    }

    #[test]
    fn test_no_extension() {
        assert_eq!(extract_keywords("quarterly report"), ["quarterly", "report"]);
    }
}
