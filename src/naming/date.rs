// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Date extraction from filenames

use chrono::Local;
use once_cell::sync::Lazy;
use regex::Regex;

/// Full English month names, January first.
const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// One compiled pattern per month, matching forms like
/// "August 28, 2024" or "August+28,+2024".
static MONTH_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    MONTH_NAMES
        .iter()
        .map(|month| {
            Regex::new(&format!(
                r"(?i){}\s*[\+_]?\s*(\d{{1,2}})[,\s\+_]+(\d{{4}})",
                month
            ))
            .expect("month pattern is valid")
        })
        .collect()
});

static NUMERIC_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{4})[-/\s](\d{1,2})[-/\s](\d{1,2})").expect("numeric date pattern is valid")
});

/// Extract a `YYYYMMDD` date string from a filename.
///
/// Month names are tried in calendar order (January through December) and
/// the first month whose pattern matches anywhere in the string wins, even
/// if a different month name appears earlier in the text. Files already
/// renamed under this rule exist, so the iteration order is load-bearing
/// and must not be changed to positional matching.
///
/// Falls back to a numeric `YYYY-MM-DD` / `YYYY/MM/DD` pattern, then to
/// today's local date.
pub fn extract_date(filename: &str) -> String {
    for (index, pattern) in MONTH_PATTERNS.iter().enumerate() {
        if let Some(caps) = pattern.captures(filename) {
            let day: u32 = caps[1].parse().unwrap_or(0);
            let year = &caps[2];
            return format!("{}{:02}{:02}", year, index + 1, day);
        }
    }

    if let Some(caps) = NUMERIC_DATE.captures(filename) {
        let month: u32 = caps[2].parse().unwrap_or(0);
        let day: u32 = caps[3].parse().unwrap_or(0);
        return format!("{}{:02}{:02}", &caps[1], month, day);
    }

    Local::now().format("%Y%m%d").to_string()
}
