//! Provider-agnostic request and response types
//!
//! Backends translate these to and from their own wire formats.

pub mod embedding;
pub mod options;
pub mod prompt;
pub mod response;
pub mod stream;

pub use embedding::{EmbedOptions, EmbedResult, EmbeddingUsage};
pub use options::{CallOptions, FunctionTool, Mode, ResponseFormat, ToolChoice};
pub use prompt::{AssistantPart, ImageData, Message, Prompt, Role, ToolResultPart, UserPart};
pub use response::{CallWarning, FinishReason, GenerateResult, RawCall, RawResponse, RequestEcho, Usage};
pub use stream::{PartStream, StreamPart, StreamResult};
