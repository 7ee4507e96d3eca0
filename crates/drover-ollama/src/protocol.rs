//! Ollama `/api/chat` and `/api/embed` wire format types

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

// -- Chat request types --

/// Ollama chat request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OllamaChatRequest {
    /// Model identifier
    pub model: String,
    /// Conversation messages
    pub messages: Vec<OllamaChatMessage>,
    /// Output format constraint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<OllamaFormat>,
    /// Generation parameters
    #[serde(skip_serializing_if = "OllamaOptions::is_empty")]
    pub options: OllamaOptions,
    /// Streaming flag; Ollama streams when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
}

/// Output format constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OllamaFormat {
    /// Force a JSON object answer
    Json,
}

/// Message role on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OllamaRole {
    System,
    User,
    Assistant,
    Tool,
}

/// Message within a chat request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OllamaChatMessage {
    /// Message role
    pub role: OllamaRole,
    /// Text content; Ollama accepts only a single string
    pub content: String,
    /// Base64-encoded images (user messages only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    /// Tool call this message answers (tool messages only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl OllamaChatMessage {
    /// Plain text message with no images or tool correlation
    pub fn text(role: OllamaRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            images: None,
            tool_call_id: None,
        }
    }
}

/// Generation parameters
///
/// Unset fields are omitted from the request body.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OllamaOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mirostat: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mirostat_eta: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mirostat_tau: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_ctx: Option<u32>,
    /// Maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_predict: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat_last_n: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat_penalty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tfs_z: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
}

impl OllamaOptions {
    /// Whether no parameter is set
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// -- Chat response types --

/// Non-streaming chat response
#[derive(Debug, Clone, Deserialize)]
pub struct OllamaChatResponse {
    /// Model used
    #[serde(default)]
    pub model: String,
    /// Creation timestamp (RFC 3339)
    #[serde(default)]
    pub created_at: String,
    /// Generated message
    pub message: OllamaResponseMessage,
    /// Always `true` for a complete response
    #[serde(deserialize_with = "literal_true")]
    pub done: bool,
    /// Tokens generated
    pub eval_count: u64,
    /// Time spent generating, in nanoseconds
    #[serde(default)]
    pub eval_duration: Option<u64>,
    /// Tokens in the prompt, when evaluated
    #[serde(default)]
    pub prompt_eval_count: Option<u64>,
}

/// Message within a chat response
#[derive(Debug, Clone, Deserialize)]
pub struct OllamaResponseMessage {
    /// Role (always `assistant`)
    #[serde(default)]
    pub role: Option<OllamaRole>,
    /// Text content
    pub content: String,
}

// -- Streaming types --

/// One line of a streaming chat response, discriminated by `done`
#[derive(Debug, Clone, PartialEq)]
pub enum OllamaStreamChunk {
    /// Incremental content (`done: false`)
    Delta(OllamaStreamDelta),
    /// Terminal record with usage counts (`done: true`)
    Done(OllamaStreamDone),
}

/// Non-terminal streaming record
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OllamaStreamDelta {
    /// Model used
    #[serde(default)]
    pub model: String,
    /// Creation timestamp
    #[serde(default)]
    pub created_at: String,
    /// Message fragment
    pub message: OllamaStreamMessage,
}

/// Message fragment within a streaming record
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OllamaStreamMessage {
    /// Role (always `assistant`)
    #[serde(default)]
    pub role: Option<OllamaRole>,
    /// Content fragment
    #[serde(default)]
    pub content: Option<String>,
}

/// Terminal streaming record
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OllamaStreamDone {
    /// Model used
    #[serde(default)]
    pub model: String,
    /// Creation timestamp
    #[serde(default)]
    pub created_at: String,
    /// Tokens generated
    pub eval_count: u64,
    /// Time spent generating, in nanoseconds
    #[serde(default)]
    pub eval_duration: Option<u64>,
    /// Tokens in the prompt
    #[serde(default)]
    pub prompt_eval_count: Option<u64>,
}

impl<'de> Deserialize<'de> for OllamaStreamChunk {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;

        let done = match value.get("done") {
            Some(serde_json::Value::Bool(done)) => *done,
            Some(_) => return Err(de::Error::custom("field `done` must be a boolean")),
            None => return Err(de::Error::missing_field("done")),
        };

        let chunk = if done {
            serde_json::from_value(value).map(Self::Done)
        } else {
            serde_json::from_value(value).map(Self::Delta)
        };

        chunk.map_err(de::Error::custom)
    }
}

fn literal_true<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    if bool::deserialize(deserializer)? {
        Ok(true)
    } else {
        Err(de::Error::custom("expected `done` to be true"))
    }
}

// -- Embedding types --

/// Ollama embed request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OllamaEmbedRequest {
    /// Model identifier
    pub model: String,
    /// Values to embed
    pub input: Vec<String>,
    /// Truncate inputs longer than the context window
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truncate: Option<bool>,
}

/// Ollama embed response
#[derive(Debug, Clone, Deserialize)]
pub struct OllamaEmbedResponse {
    /// Model used
    #[serde(default)]
    pub model: String,
    /// One vector per input value
    pub embeddings: Vec<Vec<f32>>,
    /// Tokens consumed by the inputs
    #[serde(default)]
    pub prompt_eval_count: Option<u64>,
}

// -- Error response --

/// Ollama error response body
#[derive(Debug, Clone, Deserialize)]
pub struct OllamaErrorResponse {
    /// Error message
    pub error: String,
}
