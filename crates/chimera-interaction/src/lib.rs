//! Provider integrations for chimera.
//!
//! Currently a single REST client for the Gemini API implementing
//! [`chimera_core::GenerationClient`].

pub mod gemini_client;

pub use gemini_client::GeminiGenerationClient;
