//! Text-generation provider trait.

use crate::error::Error;
use async_trait::async_trait;

/// Abstraction over a hosted text-generation service.
///
/// Implementations call a large language model and surface its raw text
/// output. The trait exists so the web layer can be handed a fake provider in
/// tests and so a different hosted model can be substituted without touching
/// the request handlers.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Send a prompt to the model and return its raw text reply.
    ///
    /// The reply is returned unparsed; callers decide how to interpret it.
    /// Fails on transport errors, non-success API statuses, or when no
    /// credential is configured. No retries are performed.
    async fn generate(&self, prompt: &str) -> Result<String, Error>;

    /// Return the model identifier selected at startup (e.g. "gemini-2.5-flash").
    fn model_id(&self) -> &str;

    /// Whether a credential is configured for this provider.
    ///
    /// Used by the health check; a provider without a credential still
    /// constructs, but every `generate` call will fail.
    fn is_configured(&self) -> bool;
}
