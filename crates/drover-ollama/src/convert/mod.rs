//! Conversion between normalized provider types and the Ollama wire format

mod finish_reason;
mod messages;
mod tools;

pub use finish_reason::map_ollama_finish_reason;
pub use messages::convert_to_ollama_chat_messages;
pub use tools::inject_tools_into_system_message;
