use serde::Deserialize;
use utoipa::ToSchema;

/// Request body for the analyze and debug_analyze routes.
/// No validation beyond "text is a string"; an empty transcript is legal.
#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct AnalysisParams {
    pub(crate) text: String,
}
