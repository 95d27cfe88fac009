pub mod health;

use axum::{
    http::Uri,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as scans;
use crate::errors::AppError;
use crate::metrics::handlers as metrics;
use crate::state::AppState;
use crate::suggestions::handlers as suggestions;

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("no route for {uri}"))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Scan API
        .route("/api/v1/scans/analyze", post(scans::handle_analyze))
        .route(
            "/api/v1/scans/suggestions",
            post(suggestions::handle_suggestions),
        )
        // Quality API
        .route(
            "/api/v1/quality/metrics",
            get(metrics::handle_quality_metrics),
        )
        .fallback(not_found)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::json;
    use tower::ServiceExt;

    use super::*;
    use crate::analysis::prompts::EXTRACTION_TASK_MARKER;
    use crate::config::Config;
    use crate::judge::vetting::UnjudgedPolicy;
    use crate::llm_client::testing::ScriptedLlm;
    use crate::metrics::store::InMemoryQualityLog;

    fn app() -> Router {
        let llm = ScriptedLlm::new().json(
            EXTRACTION_TASK_MARKER,
            json!({"keywords": [
                {"text": "Python", "category": "technologies", "importance": "high"}
            ]}),
        );
        build_router(AppState {
            llm: Arc::new(llm),
            quality_log: Arc::new(InMemoryQualityLog::new()),
            config: Config {
                anthropic_api_key: "test".to_string(),
                port: 0,
                rust_log: "info".to_string(),
                judge_enabled: true,
                unjudged_policy: UnjudgedPolicy::Withhold,
            },
        })
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn resume() -> serde_json::Value {
        json!({
            "contact": {"email": "sam@example.com"},
            "summary": "Backend engineer writing Python services.",
            "skills": ["Python"]
        })
    }

    #[tokio::test]
    async fn test_health_ok() {
        let response = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_analyze_ok() {
        let body = json!({
            "job_description": "We are hiring a backend engineer. Python is required for this role.",
            "resume": resume(),
            "candidate_type": "mid"
        });
        let response = app()
            .oneshot(post_json("/api/v1/scans/analyze", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_analyze_short_jd_is_bad_request() {
        let body = json!({"job_description": "Python dev", "resume": resume()});
        let response = app()
            .oneshot(post_json("/api/v1/scans/analyze", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_metrics_empty_log_ok() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/quality/metrics?window=today")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let response = app()
            .oneshot(Request::builder().uri("/api/v1/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    async fn error_code(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        body["error"]["code"].as_str().unwrap_or_default().to_string()
    }

    #[tokio::test]
    async fn test_unknown_window_rejected() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/quality/metrics?window=monthly")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_code(response).await, "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_malformed_resume_is_validation_error() {
        let body = json!({
            "job_description": "We are hiring a backend engineer. Python is required for this role.",
            "resume": {"skills": "Python"}
        });
        let response = app()
            .oneshot(post_json("/api/v1/scans/analyze", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_code(response).await, "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_unparseable_suggestion_body_is_validation_error() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/scans/suggestions")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_code(response).await, "VALIDATION_ERROR");
    }
}
