//! Gemini API client for hosted text generation.
//!
//! This module provides an HTTP client for the Gemini `generateContent` REST
//! API. The model identifier is selected once at construction time from an
//! ordered fallback list; requests after that always use the selected model.

use crate::error::{DomainErrorKind, Error, ExternalErrorKind, InternalErrorKind};
use crate::gateway::generation::GenerationProvider;
use async_trait::async_trait;
use log::*;
use serde::{Deserialize, Serialize};
use service::config::Config;

/// A single text part of a Gemini content block
#[derive(Debug, Serialize, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: Option<String>,
}

/// One content block in a request or response
#[derive(Debug, Serialize, Deserialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// Sampling and output-format hints sent with every request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Forces the model to emit application/json rather than prose
    pub response_mime_type: String,
    /// Low temperature to reduce formatting drift in the JSON output
    pub temperature: f32,
}

/// Request body for the generateContent endpoint
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

/// Response from the generateContent endpoint
#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

/// One generation candidate
#[derive(Debug, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

/// Gemini API client
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    configured: bool,
}

impl GeminiClient {
    /// Create a new Gemini client from config.
    ///
    /// A missing API key is logged but is not an error: the client still
    /// constructs and reports itself unconfigured, and every `generate` call
    /// fails via the configuration-error path. Model fallback selection
    /// happens here, once, never per-request.
    pub async fn new(config: &Config) -> Result<Self, Error> {
        let api_key = config.gemini_api_key();
        if api_key.is_none() {
            warn!("GEMINI_API_KEY is not set; analysis requests will return empty results");
        }

        let client = build_client(api_key.as_deref())?;
        let base_url = config.gemini_base_url().to_string();
        let configured = api_key.is_some();

        let model = select_model(&client, &base_url, config.gemini_models(), configured).await;
        info!("Gemini client initialized with model: {model}");

        Ok(Self {
            client,
            base_url,
            model,
            configured,
        })
    }
}

#[async_trait]
impl GenerationProvider for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, Error> {
        if !self.configured {
            debug!("Skipping generation call: no API key configured");
            return Err(Error::config());
        }

        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                temperature: 0.2,
            },
        };

        debug!("Sending generateContent request to model {}", self.model);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to call Gemini generateContent: {e:?}");
                Error {
                    source: Some(Box::new(e)),
                    error_kind: DomainErrorKind::External(ExternalErrorKind::Network),
                }
            })?;

        let status = response.status();
        if status.is_success() {
            let body: GenerateContentResponse = response.json().await.map_err(|e| {
                warn!("Failed to parse Gemini response: {e:?}");
                Error {
                    source: Some(Box::new(e)),
                    error_kind: DomainErrorKind::External(ExternalErrorKind::Other(
                        "Invalid response from Gemini".to_string(),
                    )),
                }
            })?;
            Ok(first_candidate_text(&body))
        } else {
            let error_text = response.text().await.unwrap_or_default();
            error!("Gemini API: {status} - {error_text}");
            Err(Error {
                source: None,
                error_kind: DomainErrorKind::External(ExternalErrorKind::Provider(format!(
                    "{status}: {error_text}"
                ))),
            })
        }
    }

    fn model_id(&self) -> &str {
        &self.model
    }

    fn is_configured(&self) -> bool {
        self.configured
    }
}

/// Concatenate the text parts of the first candidate, or empty if absent.
/// An empty reply is not an error here; the normalizer degrades it.
fn first_candidate_text(response: &GenerateContentResponse) -> String {
    response
        .candidates
        .first()
        .and_then(|candidate| candidate.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .filter_map(|part| part.text.as_deref())
                .collect::<String>()
        })
        .unwrap_or_default()
}

/// Pick the first available model from the ordered candidate list.
///
/// Each candidate is probed with `GET /models/{id}`; the first one the API
/// confirms wins. When no key is configured or no candidate can be confirmed,
/// the preferred (first) candidate is selected anyway and requests degrade
/// through the error path later.
async fn select_model(
    client: &reqwest::Client,
    base_url: &str,
    candidates: &[String],
    configured: bool,
) -> String {
    let preferred = candidates
        .first()
        .cloned()
        .unwrap_or_else(|| "gemini-2.5-flash".to_string());

    if !configured {
        return preferred;
    }

    for candidate in candidates {
        let url = format!("{base_url}/models/{candidate}");
        match client.get(&url).send().await {
            Ok(response) if response.status().is_success() => {
                debug!("Model {candidate} is available");
                return candidate.clone();
            }
            Ok(response) => {
                warn!(
                    "Model {candidate} unavailable (status {}), trying next fallback",
                    response.status()
                );
            }
            Err(e) => {
                warn!("Failed to probe model {candidate}: {e:?}");
            }
        }
    }

    warn!("No candidate model could be confirmed; defaulting to {preferred}");
    preferred
}

/// Build HTTP client with the Gemini API key as a default header
fn build_client(api_key: Option<&str>) -> Result<reqwest::Client, Error> {
    let mut headers = reqwest::header::HeaderMap::new();

    if let Some(api_key) = api_key {
        let mut header_value = reqwest::header::HeaderValue::from_str(api_key).map_err(|e| {
            warn!("Failed to create API key header: {e:?}");
            Error {
                source: Some(Box::new(e)),
                error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(
                    "Invalid API key format".to_string(),
                )),
            }
        })?;
        header_value.set_sensitive(true);
        headers.insert("x-goog-api-key", header_value);
    }

    Ok(reqwest::Client::builder()
        .use_rustls_tls()
        .default_headers(headers)
        .build()?)
}
