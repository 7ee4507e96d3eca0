use serde::{Deserialize, Serialize};
use url::Url;

/// Ordered conversation handed to a model
pub type Prompt = Vec<Message>;

/// Role of a message participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Role {
    /// System instruction
    System,
    /// User message
    User,
    /// Assistant response
    Assistant,
    /// Tool/function result
    Tool,
}

impl Role {
    /// Lowercase role name
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::Tool => "tool",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Message in a normalized prompt
///
/// The role determines which part types are legal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
#[non_exhaustive]
pub enum Message {
    /// System instruction, always plain text
    System { content: String },
    /// User turn
    User { content: Vec<UserPart> },
    /// Assistant turn
    Assistant { content: Vec<AssistantPart> },
    /// Results of tool invocations
    Tool { content: Vec<ToolResultPart> },
}

impl Message {
    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::System { content: content.into() }
    }

    /// Create a user message with a single text part
    pub fn user(text: impl Into<String>) -> Self {
        Self::User {
            content: vec![UserPart::text(text)],
        }
    }

    /// Create an assistant message with a single text part
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::Assistant {
            content: vec![AssistantPart::Text { text: text.into() }],
        }
    }

    /// Role of this message
    pub const fn role(&self) -> Role {
        match self {
            Self::System { .. } => Role::System,
            Self::User { .. } => Role::User,
            Self::Assistant { .. } => Role::Assistant,
            Self::Tool { .. } => Role::Tool,
        }
    }
}

/// Part of a user message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
#[non_exhaustive]
pub enum UserPart {
    /// Text content
    Text { text: String },
    /// Image, inline or referenced
    Image {
        /// Image payload
        image: ImageData,
        /// IANA media type, when known
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mime_type: Option<String>,
    },
}

impl UserPart {
    /// Create a text part
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Create an inline image part from raw bytes
    pub fn image_bytes(bytes: impl Into<Vec<u8>>, mime_type: Option<&str>) -> Self {
        Self::Image {
            image: ImageData::Bytes(bytes.into()),
            mime_type: mime_type.map(str::to_owned),
        }
    }

    /// Create an image part referencing a URL
    pub fn image_url(url: Url) -> Self {
        Self::Image {
            image: ImageData::Url(url),
            mime_type: None,
        }
    }
}

/// Image payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageData {
    /// Raw image bytes
    Bytes(Vec<u8>),
    /// External reference
    Url(Url),
}

/// Part of an assistant message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
#[non_exhaustive]
pub enum AssistantPart {
    /// Text content
    Text { text: String },
    /// Tool invocation previously emitted by the model
    ToolCall {
        /// Correlation identifier
        tool_call_id: String,
        /// Name of the invoked tool
        tool_name: String,
        /// Arguments passed to the tool
        args: serde_json::Value,
    },
}

/// Result of a tool invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResultPart {
    /// Identifier of the tool call this result answers
    pub tool_call_id: String,
    /// Name of the tool that produced the result
    pub tool_name: String,
    /// Result value, structured or primitive
    pub result: serde_json::Value,
    /// Whether the tool reported a failure
    #[serde(default)]
    pub is_error: bool,
}

impl ToolResultPart {
    /// Create a successful tool result
    pub fn new(tool_call_id: impl Into<String>, tool_name: impl Into<String>, result: serde_json::Value) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            tool_name: tool_name.into(),
            result,
            is_error: false,
        }
    }
}
