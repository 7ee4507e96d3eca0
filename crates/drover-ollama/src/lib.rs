//! Ollama backend for Drover
//!
//! Translates the provider-agnostic prompt and call options into Ollama's
//! `/api/chat` and `/api/embed` wire formats, and turns both the single JSON
//! response and the newline-delimited JSON stream back into normalized
//! results, stream parts, finish reasons and usage.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod api;
pub mod chat;
pub mod convert;
pub mod embedding;
mod json;
pub mod protocol;
pub mod provider;
pub mod stream;

pub use chat::{ChatArguments, OllamaChatModel};
pub use drover_config::{ChatSettings, EmbeddingSettings};
pub use embedding::OllamaEmbeddingModel;
pub use provider::{DEFAULT_BASE_URL, Ollama, OllamaProviderSettings};
