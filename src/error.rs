//! Error types for fact checking

/// Configuration errors raised while building a provider
///
/// These are fatal: they surface to whoever first triggers provider
/// construction and are never retried.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    MissingSetting(&'static str),

    #[error("Unsupported fact checker provider: {0}")]
    UnsupportedProvider(String),

    #[error("Invalid value for {name}: {value}")]
    InvalidSetting { name: &'static str, value: String },

    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("HTTP client initialization failed: {0}")]
    ClientInit(String),
}

/// Errors returned by a fact check call
#[derive(Debug, thiserror::Error)]
pub enum FactCheckError {
    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Upstream error: status {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Model response contained no output text")]
    MissingOutput,
}

impl From<reqwest::Error> for FactCheckError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            FactCheckError::InvalidResponse(e.to_string())
        } else {
            FactCheckError::RequestFailed(e.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, FactCheckError>;
