use crate::controller::{analysis_controller, health_check_controller};
use crate::{params, AppState};
use axum::{
    routing::{get, post},
    Router,
};

use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI spec. To be a part
// of the rendered spec, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "Meeting Analyzer API"
        ),
        paths(
            analysis_controller::analyze,
            analysis_controller::selftest,
            analysis_controller::debug_analyze,
            health_check_controller::health_check,
        ),
        components(
            schemas(
                domain::AnalysisResult,
                params::analysis::AnalysisParams,
                analysis_controller::DebugAnalyzeResponse,
                health_check_controller::HealthCheckResponse,
            )
        ),
        tags(
            (name = "meeting_analyzer", description = "Meeting transcript analysis API")
        )
    )]
struct ApiDoc;

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(health_routes(app_state.clone()))
        .merge(analysis_routes(app_state))
        .merge(RapiDoc::with_openapi("/api-docs/openapi.json", ApiDoc::openapi()).path("/rapidoc"))
}

fn health_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check_controller::health_check))
        .with_state(app_state)
}

fn analysis_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/analyze", post(analysis_controller::analyze))
        .route("/selftest", get(analysis_controller::selftest))
        .route("/debug_analyze", post(analysis_controller::debug_analyze))
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header::CONTENT_TYPE, Request, StatusCode};
    use clap::Parser;
    use domain::error::{DomainErrorKind, Error as DomainError, ExternalErrorKind};
    use domain::gateway::generation::GenerationProvider;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use service::config::Config;
    use std::sync::Arc;
    use tower::ServiceExt;

    /// Provider returning a canned reply, standing in for the hosted model.
    struct CannedProvider {
        reply: String,
    }

    #[async_trait]
    impl GenerationProvider for CannedProvider {
        async fn generate(&self, _prompt: &str) -> Result<String, DomainError> {
            Ok(self.reply.clone())
        }

        fn model_id(&self) -> &str {
            "canned-model"
        }

        fn is_configured(&self) -> bool {
            true
        }
    }

    /// Provider that always fails, as if the hosted API were unreachable.
    struct FailingProvider;

    #[async_trait]
    impl GenerationProvider for FailingProvider {
        async fn generate(&self, _prompt: &str) -> Result<String, DomainError> {
            Err(DomainError {
                source: None,
                error_kind: DomainErrorKind::External(ExternalErrorKind::Network),
            })
        }

        fn model_id(&self) -> &str {
            "unreachable-model"
        }

        fn is_configured(&self) -> bool {
            false
        }
    }

    fn test_router(provider: Arc<dyn GenerationProvider>) -> Router {
        let config = Config::parse_from(["meeting_analyzer_rs"]);
        define_routes(AppState::new(config, provider))
    }

    async fn response_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_reports_model_and_never_errors_without_credential() {
        let router = test_router(Arc::new(FailingProvider));

        let response = router
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body, json!({"ok": false, "model": "unreachable-model"}));
    }

    #[tokio::test]
    async fn test_analyze_returns_200_with_empty_defaults_on_generation_failure() {
        let router = test_router(Arc::new(FailingProvider));

        let response = router
            .oneshot(post_json("/analyze", json!({"text": "some transcript"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(
            body,
            json!({"summary": "", "action_items": [], "blockers": []})
        );
    }

    #[tokio::test]
    async fn test_analyze_normalizes_model_reply() {
        let provider = CannedProvider {
            reply: r#"{"summary":"ok","action_items":[1,2],"blockers":[]}"#.to_string(),
        };
        let router = test_router(Arc::new(provider));

        let response = router
            .oneshot(post_json("/analyze", json!({"text": ""})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(
            body,
            json!({"summary": "ok", "action_items": ["1", "2"], "blockers": []})
        );
    }

    #[tokio::test]
    async fn test_selftest_returns_analysis_shape() {
        let provider = CannedProvider {
            reply: r#"{"summary":"sample run","action_items":["a"],"blockers":["b"]}"#.to_string(),
        };
        let router = test_router(Arc::new(provider));

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/selftest")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(
            body,
            json!({"summary": "sample run", "action_items": ["a"], "blockers": ["b"]})
        );
    }

    #[tokio::test]
    async fn test_selftest_degrades_to_empty_defaults_on_failure() {
        let router = test_router(Arc::new(FailingProvider));

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/selftest")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(
            body,
            json!({"summary": "", "action_items": [], "blockers": []})
        );
    }

    #[tokio::test]
    async fn test_debug_analyze_returns_raw_model_output() {
        let provider = CannedProvider {
            reply: "```json\nnot normalized\n```".to_string(),
        };
        let router = test_router(Arc::new(provider));

        let response = router
            .oneshot(post_json("/debug_analyze", json!({"text": "t"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body, json!({"raw": "```json\nnot normalized\n```"}));
    }

    #[tokio::test]
    async fn test_debug_analyze_surfaces_transport_errors() {
        let router = test_router(Arc::new(FailingProvider));

        let response = router
            .oneshot(post_json("/debug_analyze", json!({"text": "t"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
