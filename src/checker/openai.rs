//! Retrieval-augmented fact checker on the OpenAI Responses API
//!
//! One request per check: the judging protocol as system message, the
//! statement as user message, and a `file_search` tool restricted to a
//! single vector store. Retrieval hits become citations; the model's
//! output text becomes the verdict body.

use super::models::{CheckResult, ProviderKind};
use super::prompts::{system_instruction, PromptVariant};
use super::verdict::{compose_answer, format_citation, is_negative_verdict};
use super::FactChecker;
use crate::error::{ConfigError, FactCheckError, Result};
use crate::metrics::METRICS;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// Configuration for the retrieval-augmented provider
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// API credential (`OPENAI_API_KEY`)
    pub api_key: Option<SecretString>,
    /// Knowledge-corpus identifier (`VECTOR_STORE_ID`)
    pub vector_store_id: Option<String>,
    pub model: String,
    pub base_url: String,
    /// Client-side request timeout; unset leaves the call unbounded
    pub timeout_ms: Option<u64>,
    pub prompt: PromptVariant,
    /// Subject of the critical-claims-only instruction
    pub critical_subject: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            vector_store_id: None,
            model: "o3".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout_ms: None,
            prompt: PromptVariant::Standard,
            critical_subject: "チームみらい".to_string(),
        }
    }
}

impl OpenAiConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

/// Fact checker backed by a language model with file search
pub struct OpenAiFactChecker {
    http: Client,
    api_key: SecretString,
    vector_store_id: String,
    model: String,
    url: String,
    instruction: String,
}

impl OpenAiFactChecker {
    /// Validate configuration and build the HTTP client
    pub fn new(config: OpenAiConfig) -> std::result::Result<Self, ConfigError> {
        let timeout = config.timeout();

        let vector_store_id = config
            .vector_store_id
            .filter(|id| !id.trim().is_empty())
            .ok_or(ConfigError::MissingSetting("VECTOR_STORE_ID"))?;

        let api_key = config
            .api_key
            .filter(|key| !key.expose_secret().trim().is_empty())
            .ok_or(ConfigError::MissingSetting("OPENAI_API_KEY"))?;

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ConfigError::ClientInit(e.to_string()))?;

        let url = format!("{}/responses", config.base_url.trim_end_matches('/'));
        let instruction = system_instruction(config.prompt, &config.critical_subject);

        info!(
            "OpenAI fact checker ready: model={}, vector_store={}, prompt={:?}",
            config.model, vector_store_id, config.prompt
        );

        Ok(Self {
            http,
            api_key,
            vector_store_id,
            model: config.model,
            url,
            instruction,
        })
    }

    fn build_request<'a>(&'a self, content: &'a str) -> ResponsesRequest<'a> {
        ResponsesRequest {
            model: &self.model,
            tools: vec![Tool::FileSearch {
                vector_store_ids: vec![self.vector_store_id.as_str()],
            }],
            include: vec!["file_search_call.results"],
            input: vec![
                InputMessage {
                    kind: Some("message"),
                    role: "system",
                    content: &self.instruction,
                },
                InputMessage {
                    kind: None,
                    role: "user",
                    content,
                },
            ],
        }
    }

    async fn call_responses_api(&self, content: &str) -> Result<String> {
        let request = self.build_request(content);

        let response = self
            .http
            .post(&self.url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(FactCheckError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl FactChecker for OpenAiFactChecker {
    fn provider(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    async fn fact_check(&self, content: &str) -> Result<CheckResult> {
        let start = Instant::now();
        debug!("OpenAI fact check: {} chars", content.chars().count());

        let result = self
            .call_responses_api(content)
            .await
            .and_then(|raw| normalize_response(&raw));

        match &result {
            Ok(check) => {
                METRICS.record_check(ProviderKind::OpenAi, check.ok, start.elapsed());
                METRICS.observe_citations(check.citations.len());
                info!(
                    "OpenAI fact check done: ok={}, citations={}",
                    check.ok,
                    check.citations.len()
                );
            }
            Err(e) => {
                METRICS.record_failure(ProviderKind::OpenAi, start.elapsed());
                error!("OpenAI fact check failed: {}", e);
            }
        }

        result
    }
}

/// Turn a raw Responses API body into a normalized result
pub fn normalize_response(raw: &str) -> Result<CheckResult> {
    let response: ResponsesResponse =
        serde_json::from_str(raw).map_err(|e| FactCheckError::InvalidResponse(e.to_string()))?;

    let citations = response.citations();
    let body = response
        .output_text()
        .ok_or(FactCheckError::MissingOutput)?
        .trim()
        .to_string();
    if body.is_empty() {
        return Err(FactCheckError::MissingOutput);
    }

    let ok = !is_negative_verdict(&body);
    let answer = compose_answer(&body, &citations);

    Ok(CheckResult::new(ProviderKind::OpenAi, ok, answer).with_citations(citations))
}

// Request types for the Responses API
#[derive(Debug, Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    tools: Vec<Tool<'a>>,
    include: Vec<&'static str>,
    input: Vec<InputMessage<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Tool<'a> {
    FileSearch { vector_store_ids: Vec<&'a str> },
}

#[derive(Debug, Serialize)]
struct InputMessage<'a> {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    kind: Option<&'static str>,
    role: &'static str,
    content: &'a str,
}

// Response types for the Responses API
#[derive(Debug, Deserialize)]
struct ResponsesResponse {
    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum OutputItem {
    FileSearchCall {
        #[serde(default)]
        results: Option<Vec<FileSearchResult>>,
    },
    Message {
        #[serde(default)]
        content: Vec<ContentPart>,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    OutputText { text: String },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct FileSearchResult {
    #[serde(default)]
    file_id: String,
    #[serde(default)]
    filename: Option<String>,
    #[serde(default)]
    text: Option<String>,
}

impl ResponsesResponse {
    /// Citation entries in encounter order, duplicates kept
    fn citations(&self) -> Vec<String> {
        self.output
            .iter()
            .filter_map(|item| match item {
                OutputItem::FileSearchCall { results: Some(results) } => Some(results),
                _ => None,
            })
            .flatten()
            .filter_map(|r| format_citation(r.filename.as_deref(), &r.file_id, r.text.as_deref()))
            .collect()
    }

    /// Concatenated `output_text` parts; `None` when the model produced no message
    fn output_text(&self) -> Option<String> {
        let mut parts = self
            .output
            .iter()
            .filter_map(|item| match item {
                OutputItem::Message { content } => Some(content),
                _ => None,
            })
            .flatten()
            .filter_map(|part| match part {
                ContentPart::OutputText { text } => Some(text.as_str()),
                ContentPart::Other => None,
            })
            .peekable();

        parts.peek()?;
        Some(parts.collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> OpenAiConfig {
        OpenAiConfig {
            api_key: Some(SecretString::new("test-api-key".to_string())),
            vector_store_id: Some("test-vector-store-id".to_string()),
            ..OpenAiConfig::default()
        }
    }

    #[test]
    fn test_missing_vector_store_id() {
        let config = OpenAiConfig {
            vector_store_id: None,
            ..configured()
        };
        let err = OpenAiFactChecker::new(config).err().unwrap();
        assert!(matches!(err, ConfigError::MissingSetting("VECTOR_STORE_ID")));
    }

    #[test]
    fn test_missing_api_key() {
        let config = OpenAiConfig {
            api_key: None,
            ..configured()
        };
        let err = OpenAiFactChecker::new(config).err().unwrap();
        assert!(matches!(err, ConfigError::MissingSetting("OPENAI_API_KEY")));
        assert_eq!(err.to_string(), "OPENAI_API_KEY is not set");
    }

    #[test]
    fn test_blank_api_key_is_missing() {
        let config = OpenAiConfig {
            api_key: Some(SecretString::new(String::new())),
            ..configured()
        };
        assert!(OpenAiFactChecker::new(config).is_err());
    }

    #[test]
    fn test_construction_succeeds_when_configured() {
        let checker = OpenAiFactChecker::new(configured()).unwrap();
        assert_eq!(checker.provider(), ProviderKind::OpenAi);
        assert_eq!(checker.url, "https://api.openai.com/v1/responses");
    }

    #[test]
    fn test_no_timeout_by_default() {
        assert_eq!(OpenAiConfig::default().timeout(), None);

        let config = OpenAiConfig {
            timeout_ms: Some(1_500),
            ..configured()
        };
        assert_eq!(config.timeout(), Some(Duration::from_millis(1_500)));
        assert!(OpenAiFactChecker::new(config).is_ok());
    }

    #[test]
    fn test_request_shape() {
        let checker = OpenAiFactChecker::new(configured()).unwrap();
        let json = serde_json::to_value(checker.build_request("消費税は10%")).unwrap();

        assert_eq!(json["model"], "o3");
        assert_eq!(json["tools"][0]["type"], "file_search");
        assert_eq!(json["tools"][0]["vector_store_ids"][0], "test-vector-store-id");
        assert_eq!(json["include"][0], "file_search_call.results");
        assert_eq!(json["input"][0]["type"], "message");
        assert_eq!(json["input"][0]["role"], "system");
        assert!(json["input"][1].get("type").is_none());
        assert_eq!(json["input"][1]["role"], "user");
        assert_eq!(json["input"][1]["content"], "消費税は10%");
    }

    #[test]
    fn test_normalize_negative_with_citations() {
        let raw = r#"{
            "id": "resp_1",
            "output": [
                {"type": "file_search_call", "id": "fs_1", "status": "completed",
                 "queries": ["消費税"],
                 "results": [
                    {"file_id": "file-1", "filename": "policy.md", "score": 0.9, "text": "  税率は8%  "},
                    {"file_id": "file-2", "text": "軽減税率"},
                    {"file_id": "file-3", "filename": "empty.md", "text": "   "}
                 ]},
                {"type": "message", "role": "assistant",
                 "content": [{"type": "output_text", "text": "\nNG\n- 誤り: 税率\n", "annotations": []}]}
            ]
        }"#;

        let result = normalize_response(raw).unwrap();

        assert!(!result.ok);
        assert_eq!(
            result.citations,
            vec![
                "- **policy.md**\n  > 税率は8%".to_string(),
                "- **file-2**\n  > 軽減税率".to_string(),
            ]
        );
        assert!(result.answer.starts_with("NG\n- 誤り: 税率\n\n---\n\n<details>"));
        assert!(result.answer.ends_with("</details>"));
    }

    #[test]
    fn test_normalize_without_citations_keeps_body() {
        let raw = r#"{"output": [
            {"type": "reasoning", "id": "rs_1", "summary": []},
            {"type": "message", "content": [{"type": "output_text", "text": "  OK\n- 根拠: 一致  "}]}
        ]}"#;

        let result = normalize_response(raw).unwrap();

        assert!(result.ok);
        assert!(result.citations.is_empty());
        assert_eq!(result.answer, "OK\n- 根拠: 一致");
    }

    #[test]
    fn test_normalize_keeps_duplicate_citations() {
        let raw = r#"{"output": [
            {"type": "file_search_call", "results": [{"file_id": "f", "filename": "a.md", "text": "x"}]},
            {"type": "file_search_call", "results": null},
            {"type": "file_search_call", "results": [{"file_id": "f", "filename": "a.md", "text": "x"}]},
            {"type": "message", "content": [{"type": "output_text", "text": "OK"}]}
        ]}"#;

        let result = normalize_response(raw).unwrap();
        assert_eq!(result.citations.len(), 2);
        assert_eq!(result.citations[0], result.citations[1]);
    }

    #[test]
    fn test_normalize_joins_output_text_parts() {
        let raw = r#"{"output": [
            {"type": "message", "content": [
                {"type": "output_text", "text": "ng"},
                {"type": "refusal", "refusal": "no"},
                {"type": "output_text", "text": "\n- 誤り"}
            ]}
        ]}"#;

        let result = normalize_response(raw).unwrap();
        assert!(!result.ok);
        assert_eq!(result.answer, "ng\n- 誤り");
    }

    #[test]
    fn test_normalize_missing_output() {
        let err = normalize_response(r#"{"output": []}"#).unwrap_err();
        assert!(matches!(err, FactCheckError::MissingOutput));
    }

    #[test]
    fn test_normalize_blank_output_text() {
        let raw = r#"{"output": [
            {"type": "file_search_call", "results": [{"file_id": "f", "filename": "a.md", "text": "x"}]},
            {"type": "message", "content": [{"type": "output_text", "text": "   \n "}]}
        ]}"#;

        let err = normalize_response(raw).unwrap_err();
        assert!(matches!(err, FactCheckError::MissingOutput));
    }

    #[test]
    fn test_normalize_invalid_json() {
        let err = normalize_response("not json").unwrap_err();
        assert!(matches!(err, FactCheckError::InvalidResponse(_)));
    }
}
