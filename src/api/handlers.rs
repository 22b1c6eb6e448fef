//! HTTP handlers for the fact-check endpoint

use crate::checker::{CheckResult, FactChecker};
use crate::metrics::METRICS;
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

/// Application state shared by the handlers
#[derive(Clone)]
pub struct AppState {
    pub checker: Arc<dyn FactChecker>,
}

/// Fact check request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactCheckRequest {
    pub text: String,
}

/// API error body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

pub mod error_codes {
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const UPSTREAM_ERROR: &str = "UPSTREAM_ERROR";
}

/// Check a statement
///
/// POST /api/fact-check
pub async fn fact_check(
    State(state): State<AppState>,
    Json(request): Json<FactCheckRequest>,
) -> Result<Json<CheckResult>, (StatusCode, Json<ApiError>)> {
    let text = request.text.trim();

    if text.is_empty() {
        METRICS.record_http("fact_check", StatusCode::BAD_REQUEST.as_u16());
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiError::new(error_codes::VALIDATION_ERROR, "text cannot be empty")),
        ));
    }

    info!(
        "Fact check request: provider={}, {} chars",
        state.checker.provider(),
        text.chars().count()
    );

    match state.checker.fact_check(text).await {
        Ok(result) => {
            METRICS.record_http("fact_check", StatusCode::OK.as_u16());
            info!("Fact check result: {}", result.label());
            Ok(Json(result))
        }
        Err(e) => {
            let status = StatusCode::BAD_GATEWAY;
            METRICS.record_http("fact_check", status.as_u16());
            error!("Fact check failed: {}", e);
            Err((
                status,
                Json(ApiError::new(error_codes::UPSTREAM_ERROR, e.to_string())),
            ))
        }
    }
}

/// Liveness probe
///
/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "provider": state.checker.provider(),
    }))
}

/// Prometheus scrape endpoint
///
/// GET /metrics
pub async fn metrics() -> String {
    METRICS.export_prometheus()
}
