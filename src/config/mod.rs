// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Configuration management for Onomast

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main application configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    /// Anthropic API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Scanning and naming rules
    #[serde(default)]
    pub rules: RuleConfig,

    /// Web UI settings
    #[serde(default)]
    pub web: WebConfig,

    /// History journal path
    #[serde(default = "default_history_file")]
    pub history_file: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiConfig {
    #[serde(default = "default_api_url")]
    pub url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_retries")]
    pub retries: u32,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct RuleConfig {
    /// Additional filenames to leave untouched during discovery.
    #[serde(default)]
    pub skip_files: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct WebConfig {
    #[serde(default = "default_web_host")]
    pub host: String,
    #[serde(default = "default_web_port")]
    pub port: u16,
}

// Default value functions
fn default_api_url() -> String { "https://api.anthropic.com".to_string() }
fn default_model() -> String { "claude-3-5-sonnet-20240620".to_string() }
fn default_max_tokens() -> u32 { 1000 }
fn default_timeout() -> u64 { 120 }
fn default_retries() -> u32 { 3 }
fn default_web_host() -> String { "127.0.0.1".to_string() }
fn default_web_port() -> u16 { 8080 }
fn default_history_file() -> String { crate::history::DEFAULT_HISTORY_FILE.to_string() }

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: default_api_url(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout(),
            retries: default_retries(),
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_web_host(),
            port: default_web_port(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            rules: RuleConfig::default(),
            web: WebConfig::default(),
            history_file: default_history_file(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = serde_json::from_str(&content)
                .map_err(|e| crate::OnomastError::Config(format!("Failed to parse config: {}", e)))?;
            Ok(config)
        } else {
            tracing::info!("Config file not found at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = AppConfig::load(Path::new("/nonexistent/onomast.json")).unwrap();
        assert_eq!(config.api.model, "claude-3-5-sonnet-20240620");
        assert_eq!(config.api.max_tokens, 1000);
        assert_eq!(config.web.port, 8080);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("onomast.json");

        let mut config = AppConfig::default();
        config.web.port = 9000;
        config.rules.skip_files.push("frozen.pdf".to_string());
        config.save(&path).unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded.web.port, 9000);
        assert_eq!(loaded.rules.skip_files, ["frozen.pdf"]);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("onomast.json");
        std::fs::write(&path, r#"{"api": {"model": "claude-3-haiku-20240307"}}"#).unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.api.model, "claude-3-haiku-20240307");
        assert_eq!(config.api.retries, 3);
        assert_eq!(config.history_file, "onomast_history.jsonl");
    }
}
