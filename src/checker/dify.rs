//! Fact checker delegating to a hosted Dify workflow
//!
//! Backs low-latency interactive surfaces, so a failed call is turned
//! into an `ok=false` result instead of an error.

use super::models::{CheckResult, ProviderKind};
use super::verdict::contains_negative_marker;
use super::FactChecker;
use crate::error::{ConfigError, FactCheckError, Result};
use crate::metrics::METRICS;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Suffix appended to every error answer
pub const CONTACT_ADMIN: &str = "管理者に連絡してください";

/// Configuration for the workflow provider
#[derive(Debug, Clone)]
pub struct DifyConfig {
    /// Workflow URL (`FACT_CHECKER_PROVIDER_ENDPOINT`)
    pub endpoint: Option<String>,
    /// Bearer credential (`FACT_CHECKER_PROVIDER_TOKEN`)
    pub token: Option<SecretString>,
    /// End-user identifier sent with every query
    pub user: String,
    /// Client-side request timeout; unset leaves the call unbounded
    pub timeout_ms: Option<u64>,
}

impl Default for DifyConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            token: None,
            user: "abc-123".to_string(),
            timeout_ms: None,
        }
    }
}

/// Fact checker backed by a Dify workflow endpoint
pub struct DifyFactChecker {
    http: Client,
    endpoint: String,
    token: SecretString,
    user: String,
}

impl DifyFactChecker {
    pub fn new(config: DifyConfig) -> std::result::Result<Self, ConfigError> {
        let endpoint = config
            .endpoint
            .filter(|e| !e.trim().is_empty())
            .ok_or(ConfigError::MissingSetting("FACT_CHECKER_PROVIDER_ENDPOINT"))?;

        let token = config
            .token
            .filter(|t| !t.expose_secret().trim().is_empty())
            .ok_or(ConfigError::MissingSetting("FACT_CHECKER_PROVIDER_TOKEN"))?;

        let mut builder = Client::builder();
        if let Some(ms) = config.timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }
        let http = builder
            .build()
            .map_err(|e| ConfigError::ClientInit(e.to_string()))?;

        info!("Dify fact checker ready: endpoint={}", endpoint);

        Ok(Self {
            http,
            endpoint,
            token,
            user: config.user,
        })
    }

    async fn request_answer(&self, content: &str) -> Result<String> {
        let request = WorkflowRequest {
            inputs: serde_json::Map::new(),
            query: content,
            user: &self.user,
            files: Vec::new(),
        };

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(self.token.expose_secret())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(FactCheckError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let data: WorkflowResponse = response.json().await?;
        Ok(data.answer)
    }

    fn error_result(message: &str) -> CheckResult {
        CheckResult::new(
            ProviderKind::Dify,
            false,
            format!("エラーが発生しました: {}\n{}", message, CONTACT_ADMIN),
        )
    }
}

#[async_trait]
impl FactChecker for DifyFactChecker {
    fn provider(&self) -> ProviderKind {
        ProviderKind::Dify
    }

    async fn fact_check(&self, content: &str) -> Result<CheckResult> {
        let start = Instant::now();
        debug!("Dify fact check: {} chars", content.chars().count());

        let result = match self.request_answer(content).await {
            Ok(answer) => {
                let ok = !contains_negative_marker(&answer);
                METRICS.record_check(ProviderKind::Dify, ok, start.elapsed());
                CheckResult::new(ProviderKind::Dify, ok, answer)
            }
            Err(FactCheckError::Upstream { status, body }) => {
                warn!("Dify workflow returned status {}", status);
                METRICS.record_failure(ProviderKind::Dify, start.elapsed());
                Self::error_result(&body)
            }
            Err(e) => {
                warn!("Dify workflow call failed: {}", e);
                METRICS.record_failure(ProviderKind::Dify, start.elapsed());
                Self::error_result(&e.to_string())
            }
        };

        Ok(result)
    }
}

#[derive(Debug, Serialize)]
struct WorkflowRequest<'a> {
    inputs: serde_json::Map<String, serde_json::Value>,
    query: &'a str,
    user: &'a str,
    files: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct WorkflowResponse {
    answer: String,
}
