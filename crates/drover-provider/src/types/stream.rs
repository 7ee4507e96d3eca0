use std::pin::Pin;

use futures_util::Stream;

use super::response::{CallWarning, FinishReason, RawCall, RawResponse, RequestEcho, Usage};
use crate::error::ProviderError;

/// Stream of caller-facing parts
pub type PartStream = Pin<Box<dyn Stream<Item = StreamPart> + Send>>;

/// Event emitted while a streaming generation is in progress
///
/// A completed stream ends with exactly one [`StreamPart::Finish`].
#[derive(Debug, Clone)]
pub enum StreamPart {
    /// Incremental text, passed through verbatim
    TextDelta { text_delta: String },
    /// A recoverable failure, or the cancellation that ended the stream
    Error { error: ProviderError },
    /// Terminal part carrying the finish reason and usage
    Finish { finish_reason: FinishReason, usage: Usage },
}

/// Result of starting a streaming generation
pub struct StreamResult {
    /// Caller-facing part stream
    pub stream: PartStream,
    /// Raw prompt and settings
    pub raw_call: RawCall,
    /// Raw response metadata
    pub raw_response: RawResponse,
    /// Request echo
    pub request: RequestEcho,
    /// Ignored settings
    pub warnings: Vec<CallWarning>,
}

impl std::fmt::Debug for StreamResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamResult")
            .field("raw_call", &self.raw_call)
            .field("raw_response", &self.raw_response)
            .field("warnings", &self.warnings)
            .finish_non_exhaustive()
    }
}
