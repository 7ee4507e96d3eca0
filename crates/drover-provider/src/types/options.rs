use http::HeaderMap;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use super::prompt::Prompt;

/// Options for a single language model call
///
/// Generation parameters left as `None` are not sent to the backend.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    /// Generation mode
    pub mode: Mode,
    /// Conversation to complete
    pub prompt: Prompt,
    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
    /// Sampling temperature
    pub temperature: Option<f64>,
    /// Nucleus sampling threshold
    pub top_p: Option<f64>,
    /// Top-k sampling cutoff
    pub top_k: Option<u32>,
    /// Frequency penalty
    pub frequency_penalty: Option<f64>,
    /// Presence penalty
    pub presence_penalty: Option<f64>,
    /// Sequences that stop generation
    pub stop_sequences: Option<Vec<String>>,
    /// Random seed for deterministic sampling
    pub seed: Option<u64>,
    /// Requested response format
    pub response_format: Option<ResponseFormat>,
    /// Extra headers for this call only
    pub headers: HeaderMap,
    /// Cancels the call when triggered
    pub abort_signal: Option<CancellationToken>,
}

impl CallOptions {
    /// Options for a plain text generation over `prompt`
    pub fn new(prompt: Prompt) -> Self {
        Self {
            prompt,
            ..Self::default()
        }
    }
}

/// How the model should produce its output
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Mode {
    /// Free-form generation, optionally with callable tools
    Regular {
        /// Tools the model may call
        tools: Vec<FunctionTool>,
        /// How the model should select tools
        tool_choice: Option<ToolChoice>,
    },
    /// Structured output through the backend's JSON mode
    ObjectJson {
        /// Name of the expected object
        name: Option<String>,
        /// Description of the expected object
        description: Option<String>,
        /// JSON Schema of the expected object
        schema: Option<serde_json::Value>,
    },
    /// Structured output through a forced tool call
    ObjectTool {
        /// Tool whose arguments form the object
        tool: FunctionTool,
    },
    /// Structured output constrained by a grammar
    ObjectGrammar {
        /// Grammar source
        grammar: String,
    },
}

impl Default for Mode {
    fn default() -> Self {
        Self::Regular {
            tools: Vec::new(),
            tool_choice: None,
        }
    }
}

impl Mode {
    /// Mode identifier used in error messages
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Regular { .. } => "regular",
            Self::ObjectJson { .. } => "object-json",
            Self::ObjectTool { .. } => "object-tool",
            Self::ObjectGrammar { .. } => "object-grammar",
        }
    }
}

/// Declaration of a callable function tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionTool {
    /// Tool name
    pub name: String,
    /// Human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON Schema for the tool parameters
    pub parameters: serde_json::Value,
}

/// How the model should select tools
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolChoice {
    /// Model decides whether to call tools
    Auto,
    /// Model will not call any tools
    None,
    /// Model must call at least one tool
    Required,
    /// Model must call the named tool
    Tool { tool_name: String },
}

/// Requested response format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ResponseFormat {
    /// Plain text
    Text,
    /// JSON, optionally constrained by a schema
    Json {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        schema: Option<serde_json::Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
}
