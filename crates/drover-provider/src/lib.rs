//! Provider-agnostic language model interface
//!
//! Defines the normalized prompt, call options, result and stream part types
//! that every Drover backend translates to and from its own wire format,
//! together with the [`LanguageModel`] and [`EmbeddingModel`] traits.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod error;
pub mod model;
pub mod types;

pub use error::ProviderError;
pub use model::{EmbeddingModel, LanguageModel, ObjectGenerationMode};
pub use types::*;
