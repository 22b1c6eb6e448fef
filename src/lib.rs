//! Statement fact-checking behind interchangeable verification providers
//!
//! The [`checker`] module holds the provider contract, the three
//! providers, and the factory that selects one by configuration.
//! [`api`] is a thin HTTP surface over a selected provider.

pub mod api;
pub mod checker;
pub mod config;
pub mod error;
pub mod metrics;

pub use checker::{CheckResult, FactChecker, FactCheckerFactory, ProviderKind};
pub use config::Settings;
pub use error::{ConfigError, FactCheckError, Result};
