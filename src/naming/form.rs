// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Document form classification
//!
//! Maps a file extension plus filename keywords to one of the fixed
//! 3-letter form codes of the naming convention. This classifier never
//! looks at file content; it is the fallback path used exactly when
//! content analysis is unavailable.

/// The published document form codes, shown to Claude in the naming prompt
/// and listed by the `forms` subcommand.
///
/// The generic defaults `DOC` (Word/PDF) and `MIS` (unknown extension) are
/// deliberately not part of this table.
pub const DOCUMENT_FORMS: &[(&str, &str)] = &[
    ("ACT", "Action Request"),
    ("AGD", "Agenda"),
    ("AGR", "Agreement"),
    ("ANN", "Announcement"),
    ("APP", "Application/Appendix"),
    ("ART", "Article"),
    ("BIO", "Biography"),
    ("BRC", "Brochure"),
    ("BRN", "Briefing Note"),
    ("CHT", "Chart"),
    ("COD", "Code"),
    ("COF", "Configuration File"),
    ("CON", "Contract"),
    ("COV", "Cover Page"),
    ("DFT", "Discussion Draft"),
    ("DRT", "Directory"),
    ("DWG", "Drawing"),
    ("ETD", "Electronic Thesis"),
    ("EXA", "Example"),
    ("FCT", "Fact Sheet"),
    ("FRM", "Form"),
    ("GRA", "Grant"),
    ("GUI", "Guidelines"),
    ("IMG", "Image"),
    ("INT", "Interview"),
    ("INV", "Invoice"),
    ("INX", "Index"),
    ("LCT", "Lecture"),
    ("LGL", "Legal Document"),
    ("LOG", "Log File"),
    ("LTR", "Letter"),
    ("MEM", "Memo"),
    ("MIN", "Minutes"),
    ("MKT", "Marketing"),
    ("MNL", "Manual"),
    ("MTG", "Meeting notes"),
    ("NSL", "Newsletter"),
    ("PLN", "Plan"),
    ("PMT", "Permit"),
    ("POL", "Policy"),
    ("PPR", "Paper"),
    ("PRC", "Procedure/Process"),
    ("PRF", "Profile"),
    ("PRO", "Proposal"),
    ("PRS", "Presentation"),
    ("PRL", "Press Release"),
    ("PST", "Poster"),
    ("RPT", "Report"),
    ("RVW", "Review"),
    ("SCH", "Schedule"),
    ("SPE", "Speech"),
    ("SRY", "Survey"),
    ("SUM", "Summary"),
    ("SUP", "Supplement"),
    ("TML", "Timeline"),
    ("TOR", "Terms of Reference"),
    ("YRB", "Year Book"),
    ("DAT", "Data"),
    ("COB", "Code Book"),
];

/// Look up the description of a form code.
pub fn describe(code: &str) -> Option<&'static str> {
    DOCUMENT_FORMS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, d)| *d)
}

/// Classify a file into a document form code.
///
/// `extension` must be lowercased and include the leading dot. The first
/// matching rule within an extension group wins.
pub fn classify(extension: &str, keywords: &[String]) -> &'static str {
    match extension {
        ".xlsx" | ".xls" | ".csv" => {
            if keywords
                .iter()
                .any(|kw| kw.to_lowercase().contains("application"))
            {
                "APP"
            } else {
                // Covers the "data" keyword case and the spreadsheet default
                "DAT"
            }
        }
        ".docx" | ".doc" => {
            if any_equals(keywords, &["report", "reporting"]) {
                "RPT"
            } else if any_equals(keywords, &["memo", "memorandum"]) {
                "MEM"
            } else if any_equals(keywords, &["form"]) {
                "FRM"
            } else {
                "DOC"
            }
        }
        ".pdf" => {
            if any_equals(keywords, &["report"]) {
                "RPT"
            } else {
                "DOC"
            }
        }
        ".jpg" | ".jpeg" | ".png" | ".gif" => "IMG",
        _ => "MIS",
    }
}

fn any_equals(keywords: &[String], candidates: &[&str]) -> bool {
    keywords
        .iter()
        .any(|kw| candidates.iter().any(|c| kw.eq_ignore_ascii_case(c)))
}
