//! Outbound clients for external services.

pub mod gemini;
pub mod generation;
