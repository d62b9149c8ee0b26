// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Anthropic API client for naming suggestions

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::naming::{fallback, form, NamingSuggestion};
use crate::scanner::{truncate_chars, FileRecord};
use crate::{OnomastError, Result};

/// Anthropic API version header value.
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Characters of content preview included in the prompt.
const PROMPT_PREVIEW_CHARS: usize = 2000;

/// Capability: produce a naming suggestion for one file.
///
/// The orchestrator depends on this abstractly; the remote client and the
/// deterministic fallback both implement it, so their outputs are
/// indistinguishable in shape.
#[async_trait]
pub trait SuggestionProvider: Send + Sync {
    async fn suggest(&self, record: &FileRecord) -> Result<NamingSuggestion>;
}

/// Client for the Anthropic Messages API.
pub struct ClaudeClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    retries: u32,
}

#[derive(Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    system: String,
    messages: Vec<Message>,
}

#[derive(Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

impl ClaudeClient {
    /// Create a new client from API configuration and a key.
    pub fn new(config: &ApiConfig, api_key: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        let base_url = config.url.trim_end_matches('/').to_string();

        Self {
            client,
            base_url,
            api_key: api_key.to_string(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            retries: config.retries,
        }
    }

    /// Check that the API endpoint is reachable with this key.
    ///
    /// Sends a minimal one-token message; any well-formed HTTP response
    /// short of an auth failure counts as reachable.
    pub async fn health_check(&self) -> Result<()> {
        let url = format!("{}/v1/messages", self.base_url);
        let request = MessagesRequest {
            model: self.model.clone(),
            max_tokens: 1,
            temperature: 0.0,
            system: String::new(),
            messages: vec![Message {
                role: "user",
                content: "ping".to_string(),
            }],
        };

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                OnomastError::ClaudeUnavailable(format!(
                    "Cannot connect to {}: {}",
                    self.base_url, e
                ))
            })?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(OnomastError::ClaudeUnavailable(
                "API key rejected".to_string(),
            ));
        }

        Ok(())
    }

    /// One completion request.
    async fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/v1/messages", self.base_url);

        let request = MessagesRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: 0.0,
            system: "You are a file organization assistant that analyzes files and suggests \
                     appropriate names following specific naming conventions."
                .to_string(),
            messages: vec![Message {
                role: "user",
                content: prompt.to_string(),
            }],
        };

        debug!("Sending request to Anthropic API: model={}", self.model);

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(OnomastError::ClaudeUnavailable(format!(
                "API returned status {}",
                response.status()
            )));
        }

        let result: MessagesResponse = response.json().await?;
        let text = result
            .content
            .first()
            .map(|block| block.text.clone())
            .unwrap_or_default();

        Ok(text)
    }

    /// Completion with exponential-backoff retries.
    async fn complete_with_retry(&self, prompt: &str) -> Result<String> {
        let mut last_error = None;

        for attempt in 0..=self.retries {
            if attempt > 0 {
                let delay = Duration::from_secs(2u64.pow(attempt - 1));
                warn!("Retrying API request in {:?} (attempt {})", delay, attempt + 1);
                tokio::time::sleep(delay).await;
            }

            match self.complete(prompt).await {
                Ok(response) => return Ok(response),
                Err(e) => {
                    last_error = Some(e);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| OnomastError::ClaudeUnavailable("Unknown error".to_string())))
    }
}

#[async_trait]
impl SuggestionProvider for ClaudeClient {
    async fn suggest(&self, record: &FileRecord) -> Result<NamingSuggestion> {
        let prompt = build_prompt(record);
        let response = self.complete_with_retry(&prompt).await?;
        parse_suggestion(&response)
    }
}

/// Provider backed purely by the deterministic filename heuristic, used
/// when no API key is configured.
pub struct FallbackProvider;

#[async_trait]
impl SuggestionProvider for FallbackProvider {
    async fn suggest(&self, record: &FileRecord) -> Result<NamingSuggestion> {
        Ok(fallback::suggest(&record.filename, &record.extension))
    }
}

/// Build the naming prompt for one file.
pub fn build_prompt(record: &FileRecord) -> String {
    let forms: Vec<String> = form::DOCUMENT_FORMS
        .iter()
        .map(|(code, desc)| format!("{} ({})", code, desc))
        .collect();

    let content = if record.content_preview.is_empty() {
        "No content available".to_string()
    } else {
        truncate_chars(&record.content_preview, PROMPT_PREVIEW_CHARS)
    };

    format!(
        r#"I need help following a standardized file naming convention for a file.

Key elements in a filename include:
- Subject or Activity (required)
- Description of what the document is (required)
- Document Form (optional): Use form codes like MEM (Memo), RPT (Report), MKT (Marketing), etc.
- Date in YYYYMMDD format (required)
- Revision (required): Use 'Rev0' for first final version, letters A,B,C for drafts

The filename format should be: Subject_Description_DocumentForm_YYYYMMDD_Rev#.extension

For example: Project_RiskManagement_GUI_20150414_Rev0.pdf

Available Document Form codes include:
{}

Here is information about the file:
Filename: {}
File Type: {}
Content Preview: {}

Please analyze this file and provide ONLY a JSON response with the following format:
```json
{{
  "subject": "Brief subject/category",
  "description": "CamelCaseDescriptionOfDocument",
  "document_form": "XXX",
  "date": "YYYYMMDD",
  "revision": "Rev0",
  "reasoning": "Brief explanation of why you chose these elements"
}}
```

The date should be extracted from the file content or filename if available, otherwise use today's date.
Choose the most appropriate document form code from the list based on content.
Keep the subject and description concise but descriptive."#,
        forms.join(", "),
        record.filename,
        record.extension,
        content
    )
}

/// Parse a naming suggestion out of a model response.
///
/// A fenced ```json block is tried first; without one, the span from the
/// first `{` to the last `}` is used. A response whose block fails to
/// deserialize, or deserializes into a structurally invalid suggestion,
/// is an error so the caller can fall back to the local heuristic.
pub fn parse_suggestion(response: &str) -> Result<NamingSuggestion> {
    let body = match fenced_block(response) {
        Some(block) => block,
        None => brace_block(response)
            .ok_or_else(|| OnomastError::Parse("no structured block in response".to_string()))?,
    };

    let suggestion: NamingSuggestion = serde_json::from_str(body)
        .map_err(|e| OnomastError::Parse(format!("invalid suggestion JSON: {}", e)))?;

    if !suggestion.is_well_formed() {
        return Err(OnomastError::Parse(
            "suggestion fails structural validation".to_string(),
        ));
    }

    Ok(suggestion)
}

/// Contents of the first ```json fenced block, if any.
fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find("```json")? + "```json".len();
    let rest = &text[start..];
    let end = rest.find("```")?;
    Some(rest[..end].trim())
}

/// The span from the first `{` to the last `}`, if any.
fn brace_block(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if start < end {
        Some(&text[start..=end])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const VALID_JSON: &str = r#"{
  "subject": "Project",
  "description": "RiskManagement",
  "document_form": "GUI",
  "date": "20150414",
  "revision": "Rev0",
  "reasoning": "Guidelines document about risk management."
}"#;

    #[test]
    fn test_parse_fenced_block() {
        let response = format!("Here is my suggestion:\n```json\n{}\n```\nDone.", VALID_JSON);
        let s = parse_suggestion(&response).unwrap();
        assert_eq!(s.subject, "Project");
        assert_eq!(s.document_form, "GUI");
        assert_eq!(s.reason, "Guidelines document about risk management.");
    }

    #[test]
    fn test_parse_bare_braces() {
        let response = format!("Sure! {} Hope that helps.", VALID_JSON);
        let s = parse_suggestion(&response).unwrap();
        assert_eq!(s.date, "20150414");
        assert_eq!(s.revision, "Rev0");
    }

    #[test]
    fn test_parse_rejects_prose() {
        assert!(parse_suggestion("I cannot name this file.").is_err());
    }

    #[test]
    fn test_parse_rejects_missing_fields() {
        let response = r#"```json
{"subject": "Project", "date": "20150414"}
```"#;
        assert!(parse_suggestion(response).is_err());
    }

    #[test]
    fn test_parse_rejects_malformed_date() {
        let response = r#"{"subject": "A", "description": "B", "document_form": "RPT", "date": "April 2015", "revision": "Rev0", "reasoning": "x"}"#;
        assert!(parse_suggestion(response).is_err());
    }

    #[test]
    fn test_invalid_fenced_block_does_not_fall_through_to_braces() {
        // A fenced block takes precedence; if it is broken the whole
        // response is unparsable, matching the reference behavior.
        let response = format!("```json\nnot json\n```\n{}", VALID_JSON);
        assert!(parse_suggestion(&response).is_err());
    }

    #[test]
    fn test_prompt_includes_file_info_and_forms() {
        let record = FileRecord {
            source_path: PathBuf::from("inbox/budget.xlsx"),
            filename: "budget.xlsx".to_string(),
            extension: ".xlsx".to_string(),
            content_preview: "Sheets: Q1\n".to_string(),
        };
        let prompt = build_prompt(&record);
        assert!(prompt.contains("Filename: budget.xlsx"));
        assert!(prompt.contains("File Type: .xlsx"));
        assert!(prompt.contains("RPT (Report)"));
        assert!(prompt.contains("Sheets: Q1"));
    }

    #[tokio::test]
    async fn test_fallback_provider_matches_heuristic() {
        let record = FileRecord {
            source_path: PathBuf::from("invoice_march 3 2023.pdf"),
            filename: "invoice_march 3 2023.pdf".to_string(),
            extension: ".pdf".to_string(),
            content_preview: String::new(),
        };
        let s = FallbackProvider.suggest(&record).await.unwrap();
        assert_eq!(s.compose(".pdf"), "invoice_March_DOC_20230303_Rev0.pdf");
        assert!(s.is_well_formed());
    }
}
