//! Business logic for meeting transcript analysis.
//!
//! The `analysis` module owns the prompt construction and response
//! normalization policy; `gateway` holds the outbound client for the hosted
//! text-generation service behind an injectable trait. Consumers (the `web`
//! crate) depend on this crate only and never talk to the generation API
//! directly.

pub mod analysis;
pub mod error;
pub mod gateway;

pub use analysis::AnalysisResult;
pub use gateway::generation::GenerationProvider;
