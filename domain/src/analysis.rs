//! Meeting transcript analysis operations.
//!
//! This module owns the two pieces of actual policy in the system: prompt
//! construction and response normalization. `normalize` is the load-bearing
//! function — it takes whatever text the model produced and always returns a
//! well-formed [`AnalysisResult`], so `/analyze` can hold its contract of
//! never failing the caller over content problems.

use crate::error::Error;
use crate::gateway::generation::GenerationProvider;
use log::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Fixed instruction block prepended to every transcript. States the required
/// output schema and demands JSON-only output with no markdown fencing.
const ANALYSIS_PROMPT: &str = r#"
You are a meeting analyzer. Read the transcript and return STRICT JSON ONLY with this schema:
{
  "summary": "2-4 sentences summarizing key outcomes and decisions",
  "action_items": ["Owner: task by date", "..."],
  "blockers": ["Team/Owner: blocker (severity)"]
}
No markdown, no prose, only JSON. Transcript follows:
"#;

/// Built-in sample transcript used by the selftest route to exercise the full
/// prompt -> generate -> normalize pipeline.
pub const SELFTEST_TRANSCRIPT: &str = "\
Maria: Quick sync on the Q3 launch. We agreed to move the release to August 14.
Devon: I'll update the landing page copy by Friday.
Maria: Good. The payments integration is still blocked on the vendor sandbox access.
Devon: Noted, I'll chase their support team this week.";

/// Maximum number of characters of a malformed model reply included in logs.
const LOG_SAMPLE_CHARS: usize = 200;

/// The fixed three-field analysis shape returned to callers.
///
/// Always JSON-serializable with exactly these keys and types regardless of
/// what the model produced; `Default` is the empty-but-well-typed value every
/// failure path degrades to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AnalysisResult {
    /// Summary of key outcomes and decisions, possibly empty.
    pub summary: String,
    /// Action items in the order the model emitted them, duplicates kept.
    pub action_items: Vec<String>,
    /// Blockers in the order the model emitted them, duplicates kept.
    pub blockers: Vec<String>,
}

/// Construct the text sent to the generation model: the constant instruction
/// block followed by the caller's transcript. Total over strings — no
/// escaping or sanitization is performed.
pub fn build_prompt(transcript: &str) -> String {
    format!("{ANALYSIS_PROMPT}{transcript}")
}

/// Convert raw model output into a guaranteed-shaped [`AnalysisResult`].
///
/// Never fails, whatever the input. Policy:
/// - whole-payload fallback when the reply is not a JSON object (parse error,
///   top-level array or scalar): all three fields default to empty;
/// - per-field defaulting when the object is present but a field is missing
///   or wrong-typed;
/// - array elements are coerced to strings (JSON strings verbatim, anything
///   else rendered as compact JSON), and entries that trim to empty are
///   dropped (strict coercion).
pub fn normalize(raw: &str) -> AnalysisResult {
    let data = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            warn!(
                "Model reply is valid JSON but not an object (found {}); using empty defaults",
                json_type_name(&other)
            );
            serde_json::Map::new()
        }
        Err(e) => {
            warn!(
                "Model reply is not valid JSON ({e}); sample: {:?}",
                log_sample(raw)
            );
            serde_json::Map::new()
        }
    };

    AnalysisResult {
        summary: extract_summary(data.get("summary")),
        action_items: extract_items(data.get("action_items")),
        blockers: extract_items(data.get("blockers")),
    }
}

/// Build the prompt, call the generation provider, and normalize the reply.
///
/// This is the `/analyze` operation end to end. A failed generation call
/// (transport, auth, quota, missing credential) is logged and degrades to the
/// empty default result — it never propagates to the caller.
pub async fn analyze(provider: &dyn GenerationProvider, transcript: &str) -> AnalysisResult {
    let prompt = build_prompt(transcript);

    match provider.generate(&prompt).await {
        Ok(raw) => normalize(&raw),
        Err(e) => {
            warn!("Generation call failed; returning empty analysis: {e}");
            AnalysisResult::default()
        }
    }
}

/// Run the analysis prompt and return the model's reply without
/// normalization. Diagnostic path only; transport errors propagate.
pub async fn debug_analyze(
    provider: &dyn GenerationProvider,
    transcript: &str,
) -> Result<String, Error> {
    let prompt = build_prompt(transcript);
    provider.generate(&prompt).await
}

/// `summary` keeps only a non-empty JSON string; anything else defaults.
fn extract_summary(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(summary)) => summary.clone(),
        _ => String::new(),
    }
}

/// Array fields keep only JSON arrays; each element is coerced to a string
/// and whitespace-only entries are dropped.
fn extract_items(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .map(coerce_to_string)
            .filter(|item| !item.trim().is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

/// JSON strings are taken verbatim; numbers, booleans, nulls, and nested
/// structures are rendered as compact JSON so they cannot break the output
/// contract.
fn coerce_to_string(value: &Value) -> String {
    match value {
        Value::String(item) => item.clone(),
        other => other.to_string(),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Truncated sample of a malformed reply for operator diagnosis. Char-based
/// so multi-byte input cannot split a UTF-8 boundary.
fn log_sample(raw: &str) -> String {
    raw.chars().take(LOG_SAMPLE_CHARS).collect()
}
