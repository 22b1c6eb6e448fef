//! Process configuration
//!
//! Values come from an optional `fact-checker.toml`, then the environment
//! (a `.env` file is loaded first when present). Keys are the lowercased
//! environment variable names, e.g. `FACT_CHECKER_PROVIDER` maps to
//! `fact_checker_provider`.
//!
//! The environment source is unprefixed, so any `HOST` or `PORT` already
//! present in the deploy environment also moves the listener address.

use crate::checker::{DifyConfig, OpenAiConfig, PromptVariant, ProviderKind};
use crate::error::ConfigError;
use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use secrecy::SecretString;
use serde::Deserialize;
use tracing::debug;

/// Settings consumed by the fact checker and its HTTP surface
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Provider selector: `openai`, `local` or `dify`
    #[serde(default)]
    pub fact_checker_provider: Option<String>,

    #[serde(default)]
    pub openai_api_key: Option<SecretString>,

    #[serde(default)]
    pub vector_store_id: Option<String>,

    #[serde(default = "default_openai_model")]
    pub openai_model: String,

    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,

    #[serde(default)]
    pub openai_timeout_ms: Option<u64>,

    /// Instruction variant: `standard` or `critical`
    #[serde(default)]
    pub fact_checker_prompt: Option<String>,

    #[serde(default = "default_critical_subject")]
    pub fact_checker_critical_subject: String,

    #[serde(default)]
    pub fact_checker_provider_endpoint: Option<String>,

    #[serde(default)]
    pub fact_checker_provider_token: Option<SecretString>,

    #[serde(default = "default_workflow_user")]
    pub fact_checker_provider_user: String,

    #[serde(default)]
    pub fact_checker_provider_timeout_ms: Option<u64>,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_openai_model() -> String { OpenAiConfig::default().model }
fn default_openai_base_url() -> String { OpenAiConfig::default().base_url }
fn default_critical_subject() -> String { OpenAiConfig::default().critical_subject }
fn default_workflow_user() -> String { DifyConfig::default().user }
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

impl Default for Settings {
    fn default() -> Self {
        Self {
            fact_checker_provider: None,
            openai_api_key: None,
            vector_store_id: None,
            openai_model: default_openai_model(),
            openai_base_url: default_openai_base_url(),
            openai_timeout_ms: None,
            fact_checker_prompt: None,
            fact_checker_critical_subject: default_critical_subject(),
            fact_checker_provider_endpoint: None,
            fact_checker_provider_token: None,
            fact_checker_provider_user: default_workflow_user(),
            fact_checker_provider_timeout_ms: None,
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Settings {
    /// Load from `.env`, `fact-checker.toml` and the process environment
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!("Loaded environment from {}", path.display());
        }

        let settings = ConfigBuilder::builder()
            .add_source(File::with_name("fact-checker").required(false))
            .add_source(Environment::default())
            .build()?
            .try_deserialize()?;

        Ok(settings)
    }

    /// Parse settings from TOML text, without the environment
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let settings = ConfigBuilder::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()?
            .try_deserialize()?;

        Ok(settings)
    }

    pub fn provider_kind(&self) -> Result<ProviderKind, ConfigError> {
        ProviderKind::from_selector(self.fact_checker_provider.as_deref())
    }

    pub fn prompt_variant(&self) -> Result<PromptVariant, ConfigError> {
        self.fact_checker_prompt
            .as_deref()
            .map_or(Ok(PromptVariant::Standard), str::parse)
    }

    /// Configuration for the retrieval-augmented provider
    pub fn openai(&self) -> Result<OpenAiConfig, ConfigError> {
        Ok(OpenAiConfig {
            api_key: self.openai_api_key.clone(),
            vector_store_id: self.vector_store_id.clone(),
            model: self.openai_model.clone(),
            base_url: self.openai_base_url.clone(),
            timeout_ms: self.openai_timeout_ms,
            prompt: self.prompt_variant()?,
            critical_subject: self.fact_checker_critical_subject.clone(),
        })
    }

    /// Configuration for the workflow provider
    pub fn dify(&self) -> DifyConfig {
        DifyConfig {
            endpoint: self.fact_checker_provider_endpoint.clone(),
            token: self.fact_checker_provider_token.clone(),
            user: self.fact_checker_provider_user.clone(),
            timeout_ms: self.fact_checker_provider_timeout_ms,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
