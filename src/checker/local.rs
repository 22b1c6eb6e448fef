//! Local provider for development and tests

use super::models::{CheckResult, ProviderKind};
use super::verdict::POSITIVE_MARKER;
use super::FactChecker;
use crate::error::Result;
use async_trait::async_trait;
use tracing::debug;

/// Deterministic fact checker that performs no verification
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFactChecker;

impl LocalFactChecker {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FactChecker for LocalFactChecker {
    fn provider(&self) -> ProviderKind {
        ProviderKind::Local
    }

    async fn fact_check(&self, content: &str) -> Result<CheckResult> {
        let chars = content.chars().count();
        debug!("Local fact check: {} chars", chars);

        Ok(CheckResult::new(
            ProviderKind::Local,
            true,
            format!(
                "{}\nローカルプロバイダーのため検証は行っていません（入力 {} 文字）。",
                POSITIVE_MARKER, chars
            ),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_local_is_deterministic() {
        let checker = LocalFactChecker::new();
        let first = checker.fact_check("チームみらい最高！").await.unwrap();
        let second = checker.fact_check("チームみらい最高！").await.unwrap();

        assert_eq!(first, second);
        assert!(first.ok);
        assert!(first.citations.is_empty());
        assert!(first.answer.starts_with("OK"));
        assert!(first.answer.contains("9 文字"));
    }

    #[test]
    fn test_local_accepts_empty_input() {
        let result = tokio_test::block_on(LocalFactChecker::new().fact_check("")).unwrap();
        assert_eq!(result.provider, ProviderKind::Local);
        assert!(!result.answer.is_empty());
    }
}
