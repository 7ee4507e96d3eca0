use http::HeaderMap;
use tokio_util::sync::CancellationToken;

use super::response::RawResponse;

/// Options for a single embedding call
#[derive(Debug, Clone, Default)]
pub struct EmbedOptions {
    /// Extra headers for this call only
    pub headers: HeaderMap,
    /// Cancels the call when triggered
    pub abort_signal: Option<CancellationToken>,
}

/// Token usage reported for an embedding call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbeddingUsage {
    /// Tokens consumed by the input values
    pub tokens: u64,
}

/// Result of an embedding call
#[derive(Debug, Clone)]
pub struct EmbedResult {
    /// One vector per input value, in input order
    pub embeddings: Vec<Vec<f32>>,
    /// Token usage, when reported
    pub usage: Option<EmbeddingUsage>,
    /// Raw response metadata
    pub raw_response: RawResponse,
}
