//! Router configuration

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::api::handlers::{self, AppState};

/// Maximum accepted request body
pub const MAX_BODY_SIZE: usize = 64 * 1024;

/// Build the HTTP router around a selected fact checker
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/fact-check", post(handlers::fact_check))
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE)),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::ApiError;
    use crate::checker::{CheckResult, LocalFactChecker, OpenAiConfig, OpenAiFactChecker};
    use secrecy::SecretString;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn router() -> Router {
        build_router(AppState {
            checker: Arc::new(LocalFactChecker::new()),
        })
    }

    fn post_json(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/fact-check")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_fact_check_endpoint() {
        let response = router()
            .oneshot(post_json(r#"{"text": "消費税は10%"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let result: CheckResult = serde_json::from_slice(&bytes).unwrap();
        assert!(result.ok);
        assert!(result.citations.is_empty());
    }

    #[tokio::test]
    async fn test_fact_check_rejects_blank_text() {
        let response = router()
            .oneshot(post_json(r#"{"text": "   "}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_provider_failure_maps_to_bad_gateway() {
        let checker = OpenAiFactChecker::new(OpenAiConfig {
            api_key: Some(SecretString::new("test-api-key".to_string())),
            vector_store_id: Some("vs_test".to_string()),
            base_url: "http://127.0.0.1:1".to_string(),
            timeout_ms: Some(2_000),
            ..OpenAiConfig::default()
        })
        .unwrap();
        let router = build_router(AppState {
            checker: Arc::new(checker),
        });

        let response = router
            .oneshot(post_json(r#"{"text": "消費税は10%"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let error: ApiError = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(error.code, "UPSTREAM_ERROR");
    }

    #[tokio::test]
    async fn test_health_reports_provider() {
        let response = router()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["provider"], "local");
    }
}
