//! Fact checking behind interchangeable verification providers
//!
//! Every provider satisfies [`FactChecker`] and returns a normalized
//! [`CheckResult`]:
//! - `openai`: Responses API with a `file_search` tool over one vector store
//! - `local`: deterministic stand-in, no network
//! - `dify`: hosted workflow, never fails (errors become `ok=false` results)
//!
//! [`FactCheckerFactory`] picks one by configuration and memoizes it.

pub mod dify;
pub mod factory;
pub mod local;
pub mod models;
pub mod openai;
pub mod prompts;
pub mod verdict;

use crate::error::Result;
use async_trait::async_trait;

pub use dify::{DifyConfig, DifyFactChecker};
pub use factory::FactCheckerFactory;
pub use local::LocalFactChecker;
pub use models::{CheckResult, ProviderKind};
pub use openai::{OpenAiConfig, OpenAiFactChecker};
pub use prompts::PromptVariant;

/// A verification provider
#[async_trait]
pub trait FactChecker: Send + Sync {
    /// Provider tag, for diagnostics and tests
    fn provider(&self) -> ProviderKind;

    /// Judge a statement and return the normalized verdict
    async fn fact_check(&self, content: &str) -> Result<CheckResult>;
}
