use indexmap::IndexMap;
use serde::Deserialize;
use url::Url;

/// Ollama service configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OllamaConfig {
    /// API base URL (defaults to the local Ollama daemon)
    #[serde(default)]
    pub base_url: Option<Url>,
    /// Headers attached to every request
    #[serde(default)]
    pub headers: IndexMap<String, String>,
    /// Chat model configuration
    #[serde(default)]
    pub chat: ChatConfig,
    /// Embedding model configuration
    #[serde(default)]
    pub embedding: EmbeddingConfig,
}

/// Chat model selection and per-instance settings
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChatConfig {
    /// Model identifier (e.g. `llama3.2`)
    #[serde(default = "default_chat_model")]
    pub model: String,
    /// Sampling settings applied to every call
    #[serde(default)]
    pub settings: ChatSettings,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            model: default_chat_model(),
            settings: ChatSettings::default(),
        }
    }
}

/// Per-instance chat model settings
///
/// Every field is optional; unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChatSettings {
    /// Mirostat sampling (0 = disabled, 1 = Mirostat, 2 = Mirostat 2.0)
    #[serde(default)]
    pub mirostat: Option<u8>,
    /// Mirostat learning rate
    #[serde(default)]
    pub mirostat_eta: Option<f64>,
    /// Mirostat target entropy
    #[serde(default)]
    pub mirostat_tau: Option<f64>,
    /// Context window size in tokens
    #[serde(default)]
    pub num_ctx: Option<u32>,
    /// How far back to look when penalizing repetition (-1 = `num_ctx`)
    #[serde(default)]
    pub repeat_last_n: Option<i32>,
    /// Repetition penalty strength
    #[serde(default)]
    pub repeat_penalty: Option<f64>,
    /// Stop sequences; take precedence over per-call stop sequences
    #[serde(default)]
    pub stop: Option<Vec<String>>,
    /// Tail-free sampling parameter
    #[serde(default)]
    pub tfs_z: Option<f64>,
    /// Top-k cutoff; takes precedence over the per-call value
    #[serde(default)]
    pub top_k: Option<u32>,
}

/// Embedding model selection and settings
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmbeddingConfig {
    /// Model identifier (e.g. `nomic-embed-text`)
    #[serde(default = "default_embedding_model")]
    pub model: String,
    /// Embedding settings
    #[serde(default)]
    pub settings: EmbeddingSettings,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: default_embedding_model(),
            settings: EmbeddingSettings::default(),
        }
    }
}

/// Per-instance embedding model settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmbeddingSettings {
    /// Maximum values per call (defaults to 2048)
    #[serde(default)]
    pub max_embeddings_per_call: Option<usize>,
    /// Truncate inputs that exceed the model's context length
    #[serde(default)]
    pub truncate: Option<bool>,
}

fn default_chat_model() -> String {
    "llama3.2".to_owned()
}

fn default_embedding_model() -> String {
    "nomic-embed-text".to_owned()
}
