//! Data models shared by every fact checker provider

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Provider discriminant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Retrieval-augmented language model
    #[serde(rename = "openai")]
    OpenAi,
    /// No-network stand-in
    Local,
    /// Hosted third-party workflow
    Dify,
}

impl Default for ProviderKind {
    fn default() -> Self {
        Self::Local
    }
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Local => "local",
            Self::Dify => "dify",
        }
    }

    /// Resolve the provider selector; absent or blank selects `local`
    pub fn from_selector(value: Option<&str>) -> Result<Self, ConfigError> {
        match value.map(str::trim) {
            None | Some("") => Ok(Self::Local),
            Some(v) => v.parse(),
        }
    }
}

impl FromStr for ProviderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "openai" => Ok(Self::OpenAi),
            "local" => Ok(Self::Local),
            "dify" => Ok(Self::Dify),
            other => Err(ConfigError::UnsupportedProvider(other.to_string())),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized verdict returned by every provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub provider: ProviderKind,
    /// False only when the verdict is explicitly negative
    pub ok: bool,
    pub answer: String,
    #[serde(default)]
    pub citations: Vec<String>,
}

impl CheckResult {
    pub fn new(provider: ProviderKind, ok: bool, answer: impl Into<String>) -> Self {
        Self {
            provider,
            ok,
            answer: answer.into(),
            citations: Vec::new(),
        }
    }

    pub fn with_citations(mut self, citations: Vec<String>) -> Self {
        self.citations = citations;
        self
    }

    /// Display label used by chat and web front-ends
    pub fn label(&self) -> &'static str {
        if self.ok {
            "✅ OK"
        } else {
            "❌ NG"
        }
    }
}
