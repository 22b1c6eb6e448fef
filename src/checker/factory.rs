//! Provider selection with one instance per provider kind
//!
//! The factory is an explicit value owned by the composition root; the
//! chosen provider is built on first use, validated at that moment, and
//! shared for the lifetime of the factory.

use super::dify::DifyFactChecker;
use super::local::LocalFactChecker;
use super::models::ProviderKind;
use super::openai::OpenAiFactChecker;
use super::FactChecker;
use crate::config::Settings;
use crate::error::ConfigError;
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tracing::info;

/// Builds and memoizes fact checker providers
pub struct FactCheckerFactory {
    settings: Settings,
    openai: OnceCell<Arc<OpenAiFactChecker>>,
    local: OnceCell<Arc<LocalFactChecker>>,
    dify: OnceCell<Arc<DifyFactChecker>>,
}

impl FactCheckerFactory {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            openai: OnceCell::new(),
            local: OnceCell::new(),
            dify: OnceCell::new(),
        }
    }

    /// Provider named by the configured selector
    pub fn select(&self) -> Result<Arc<dyn FactChecker>, ConfigError> {
        let kind = self.settings.provider_kind()?;
        self.create(kind)
    }

    /// Provider of a specific kind, built on first request
    pub fn create(&self, kind: ProviderKind) -> Result<Arc<dyn FactChecker>, ConfigError> {
        let checker: Arc<dyn FactChecker> = match kind {
            ProviderKind::OpenAi => self
                .openai
                .get_or_try_init(|| {
                    info!("Initializing OpenAI fact checker");
                    OpenAiFactChecker::new(self.settings.openai()?).map(Arc::new)
                })?
                .clone(),
            ProviderKind::Local => self
                .local
                .get_or_init(|| Arc::new(LocalFactChecker::new()))
                .clone(),
            ProviderKind::Dify => self
                .dify
                .get_or_try_init(|| {
                    info!("Initializing Dify fact checker");
                    DifyFactChecker::new(self.settings.dify()).map(Arc::new)
                })?
                .clone(),
        };

        Ok(checker)
    }
}
