// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Error types for Onomast

use thiserror::Error;

/// Result type alias for Onomast operations
pub type Result<T> = std::result::Result<T, OnomastError>;

/// Onomast error types
#[derive(Error, Debug)]
pub enum OnomastError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    #[error("API error: {0}")]
    Api(#[from] reqwest::Error),

    #[error("Claude not available: {0}")]
    ClaudeUnavailable(String),

    #[error("Unparsable suggestion: {0}")]
    Parse(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
