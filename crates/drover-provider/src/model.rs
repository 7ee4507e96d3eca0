//! Model traits implemented by each backend

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::types::{CallOptions, EmbedOptions, EmbedResult, GenerateResult, StreamResult};

/// Structured-output strategy a model prefers when the caller does not choose one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectGenerationMode {
    /// Backend JSON mode
    Json,
    /// Forced tool call
    Tool,
}

/// Trait implemented by each chat/completion backend
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Provider identifier (e.g. `ollama.chat`)
    fn provider(&self) -> &str;

    /// Model identifier as understood by the backend
    fn model_id(&self) -> &str;

    /// Preferred structured-output strategy
    fn default_object_generation_mode(&self) -> Option<ObjectGenerationMode>;

    /// Whether image parts may reference URLs instead of carrying bytes
    fn supports_image_urls(&self) -> bool;

    /// Run a non-streaming generation
    async fn do_generate(&self, options: CallOptions) -> Result<GenerateResult, ProviderError>;

    /// Start a streaming generation
    ///
    /// Resolves once response headers arrive; the returned part stream ends
    /// with exactly one finish part unless the call is cancelled.
    async fn do_stream(&self, options: CallOptions) -> Result<StreamResult, ProviderError>;
}

/// Trait implemented by each embedding backend
#[async_trait]
pub trait EmbeddingModel: Send + Sync {
    /// Provider identifier (e.g. `ollama.embedding`)
    fn provider(&self) -> &str;

    /// Model identifier as understood by the backend
    fn model_id(&self) -> &str;

    /// Upper bound on values per [`EmbeddingModel::do_embed`] call
    fn max_embeddings_per_call(&self) -> Option<usize>;

    /// Embed `values`, returning one vector per value
    async fn do_embed(&self, values: Vec<String>, options: EmbedOptions) -> Result<EmbedResult, ProviderError>;
}
