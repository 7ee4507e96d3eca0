use thiserror::Error;

/// Errors that can occur while calling a language or embedding model
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// Caller requested a capability the backend protocol cannot express
    #[error("'{functionality}' functionality not supported")]
    UnsupportedFunctionality { functionality: String },

    /// Message role outside the set the backend understands
    #[error("unsupported role: {role}")]
    UnsupportedRole { role: String },

    /// Backend answered with a non-success HTTP status
    #[error("API call to {url} failed with status {status}: {message}")]
    ApiCall {
        /// Request URL
        url: String,
        /// HTTP status code
        status: u16,
        /// Error message extracted from the response body, or the raw body
        message: String,
        /// Raw response body
        response_body: String,
        /// Whether repeating the request may succeed
        is_retryable: bool,
    },

    /// Connection could not be established or broke mid-exchange
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// Text was not valid JSON
    #[error("failed to parse JSON: {message}")]
    JsonParse {
        /// The text that failed to parse
        text: String,
        /// Parser error message
        message: String,
    },

    /// JSON was well-formed but did not match the expected shape
    #[error("type validation failed: {message}")]
    TypeValidation {
        /// The offending value, serialized
        value: String,
        /// Validation error message
        message: String,
    },

    /// Response parsed but carried data the adapter cannot use
    #[error("invalid response data: {message}")]
    InvalidResponseData { message: String },

    /// More values were passed to an embedding call than the model accepts
    #[error("too many values for a single embedding call: model {model_id} accepts {max}, got {count}")]
    TooManyEmbeddingValuesForCall { model_id: String, max: usize, count: usize },

    /// Caller supplied an invalid argument
    #[error("invalid argument '{argument}': {message}")]
    InvalidArgument { argument: String, message: String },

    /// Caller cancelled the call
    #[error("request was cancelled")]
    Cancelled,
}

impl ProviderError {
    /// Shorthand for [`ProviderError::UnsupportedFunctionality`]
    pub fn unsupported(functionality: impl Into<String>) -> Self {
        Self::UnsupportedFunctionality {
            functionality: functionality.into(),
        }
    }

    /// Whether repeating the same call may succeed
    ///
    /// Informational only: retry policy belongs to the caller.
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::ApiCall { is_retryable, .. } => *is_retryable,
            Self::Transport { .. } => true,
            _ => false,
        }
    }

    /// Whether this error represents a caller-triggered abort
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
