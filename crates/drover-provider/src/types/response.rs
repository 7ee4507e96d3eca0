use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Reason the model stopped generating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FinishReason {
    /// Natural end of generation or a stop sequence
    Stop,
    /// Hit the token limit
    Length,
    /// Content was filtered by safety systems
    ContentFilter,
    /// Model decided to call a tool
    ToolCalls,
    /// Generation failed
    Error,
    /// Backend reported a reason with no normalized counterpart
    Other,
    /// Backend did not report a reason
    Unknown,
}

/// Token usage for a completion
///
/// Counts the backend does not report are `NaN`, not zero.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Usage {
    /// Tokens consumed by the prompt
    pub prompt_tokens: f64,
    /// Tokens generated in the completion
    pub completion_tokens: f64,
}

impl Usage {
    /// Usage with both counts unknown
    pub const UNKNOWN: Self = Self {
        prompt_tokens: f64::NAN,
        completion_tokens: f64::NAN,
    };

    /// Build usage from optional backend counts
    #[allow(clippy::cast_precision_loss)]
    pub fn from_counts(prompt_tokens: Option<u64>, completion_tokens: Option<u64>) -> Self {
        Self {
            prompt_tokens: prompt_tokens.map_or(f64::NAN, |n| n as f64),
            completion_tokens: completion_tokens.map_or(f64::NAN, |n| n as f64),
        }
    }
}

impl Default for Usage {
    fn default() -> Self {
        Self::UNKNOWN
    }
}

/// Non-fatal notice about options the backend ignored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum CallWarning {
    /// A call setting is not supported and was ignored
    UnsupportedSetting {
        /// Setting name
        setting: String,
        /// Additional explanation
        #[serde(default, skip_serializing_if = "Option::is_none")]
        details: Option<String>,
    },
}

/// Raw prompt and settings as sent to the backend
#[derive(Debug, Clone, Default, Serialize)]
pub struct RawCall {
    /// Prompt in the backend's message format
    pub raw_prompt: serde_json::Value,
    /// All other request fields
    pub raw_settings: serde_json::Value,
}

/// Raw response metadata
#[derive(Debug, Clone, Default, Serialize)]
pub struct RawResponse {
    /// Response headers, lowercase names
    pub headers: HashMap<String, String>,
}

/// Request echo for debugging
#[derive(Debug, Clone, Default, Serialize)]
pub struct RequestEcho {
    /// Exact JSON body that was sent
    pub body: String,
}

/// Result of a non-streaming generation
#[derive(Debug, Clone)]
pub struct GenerateResult {
    /// Generated text, if any
    pub text: Option<String>,
    /// Why generation stopped
    pub finish_reason: FinishReason,
    /// Token usage
    pub usage: Usage,
    /// Raw prompt and settings
    pub raw_call: RawCall,
    /// Raw response metadata
    pub raw_response: RawResponse,
    /// Request echo
    pub request: RequestEcho,
    /// Ignored settings
    pub warnings: Vec<CallWarning>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_counts_are_nan() {
        let usage = Usage::from_counts(Some(25), None);
        assert!((usage.prompt_tokens - 25.0).abs() < f64::EPSILON);
        assert!(usage.completion_tokens.is_nan());
        assert!(Usage::default().prompt_tokens.is_nan());
    }

    #[test]
    fn finish_reason_serializes_kebab_case() {
        let json = serde_json::to_value(FinishReason::ContentFilter).unwrap();
        assert_eq!(json, "content-filter");
    }
}
