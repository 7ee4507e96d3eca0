#![allow(clippy::must_use_candidate)]

mod env;
mod loader;
pub mod logging;
pub mod ollama;

use serde::Deserialize;

pub use logging::*;
pub use ollama::*;

/// Top-level Drover configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Log output configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Ollama service configuration
    #[serde(default)]
    pub ollama: OllamaConfig,
}
