use crate::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

/// Health report for the running service
#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct HealthCheckResponse {
    /// Whether a generation credential is configured
    pub ok: bool,
    /// The model identifier selected at startup
    pub model: String,
}

/// GET the service health and active model identifier
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "API router is up; reports whether a credential is configured and which model is active", body = HealthCheckResponse)
    )
)]
pub async fn health_check(State(app_state): State<AppState>) -> impl IntoResponse {
    let generation = app_state.generation_ref();
    (
        StatusCode::OK,
        Json(HealthCheckResponse {
            ok: generation.is_configured(),
            model: generation.model_id().to_string(),
        }),
    )
}
