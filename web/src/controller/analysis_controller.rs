//! Controller for transcript analysis operations.
//!
//! `/analyze` and `/selftest` hold the system's defining contract: content
//! failures (unreachable model, malformed reply) degrade to an empty
//! well-typed result with HTTP 200, never an error status.

use crate::params::analysis::AnalysisParams;
use crate::{AppState, Error};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::analysis::{self, SELFTEST_TRANSCRIPT};
use log::*;
use serde::Serialize;
use utoipa::ToSchema;

/// Raw model output returned by the debug route
#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct DebugAnalyzeResponse {
    pub raw: String,
}

/// POST /analyze
///
/// Analyze a meeting transcript into summary, action items, and blockers.
#[utoipa::path(
    post,
    path = "/analyze",
    request_body = AnalysisParams,
    responses(
        (status = 200, description = "Analysis result; empty fields when the model call or its output failed", body = domain::AnalysisResult)
    )
)]
pub async fn analyze(
    State(app_state): State<AppState>,
    Json(params): Json<AnalysisParams>,
) -> impl IntoResponse {
    debug!(
        "POST /analyze with transcript of {} chars",
        params.text.chars().count()
    );

    let result = analysis::analyze(app_state.generation_ref(), &params.text).await;

    (StatusCode::OK, Json(result))
}

/// GET /selftest
///
/// Run a fixed built-in sample transcript through the full pipeline.
#[utoipa::path(
    get,
    path = "/selftest",
    responses(
        (status = 200, description = "Analysis of the built-in sample transcript", body = domain::AnalysisResult)
    )
)]
pub async fn selftest(State(app_state): State<AppState>) -> impl IntoResponse {
    debug!("GET /selftest");

    let result = analysis::analyze(app_state.generation_ref(), SELFTEST_TRANSCRIPT).await;

    (StatusCode::OK, Json(result))
}

/// POST /debug_analyze
///
/// Return the unmodified model output for diagnosis, bypassing
/// normalization. Unlike /analyze, transport errors surface here.
#[utoipa::path(
    post,
    path = "/debug_analyze",
    request_body = AnalysisParams,
    responses(
        (status = 200, description = "Raw model output", body = DebugAnalyzeResponse),
        (status = 502, description = "Generation service unreachable or rejected the request"),
        (status = 503, description = "No generation credential configured")
    )
)]
pub async fn debug_analyze(
    State(app_state): State<AppState>,
    Json(params): Json<AnalysisParams>,
) -> Result<impl IntoResponse, Error> {
    debug!(
        "POST /debug_analyze with transcript of {} chars",
        params.text.chars().count()
    );

    let raw = analysis::debug_analyze(app_state.generation_ref(), &params.text).await?;

    Ok((StatusCode::OK, Json(DebugAnalyzeResponse { raw })))
}
