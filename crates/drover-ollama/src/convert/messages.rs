use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use drover_provider::{AssistantPart, FunctionTool, ImageData, Message, ProviderError, ToolResultPart, UserPart};

use super::tools::inject_tools_into_system_message;
use crate::protocol::{OllamaChatMessage, OllamaRole};

/// Convert a normalized prompt into Ollama chat messages
///
/// System text carries the declared `tools`. When tools are declared but the
/// prompt has no system message, one is prepended to carry them.
pub fn convert_to_ollama_chat_messages(
    prompt: &[Message],
    tools: &[FunctionTool],
) -> Result<Vec<OllamaChatMessage>, ProviderError> {
    let mut messages = Vec::with_capacity(prompt.len() + 1);

    if !tools.is_empty() && !prompt.iter().any(|m| matches!(m, Message::System { .. })) {
        let content = inject_tools_into_system_message("", tools)?;
        messages.push(OllamaChatMessage::text(OllamaRole::System, content));
    }

    for message in prompt {
        match message {
            Message::System { content } => {
                let content = inject_tools_into_system_message(content, tools)?;
                messages.push(OllamaChatMessage::text(OllamaRole::System, content));
            }
            Message::User { content } => messages.push(convert_user_message(content)?),
            Message::Assistant { content } => messages.push(convert_assistant_message(content)),
            Message::Tool { content } => messages.extend(content.iter().map(convert_tool_result)),
            other => {
                return Err(ProviderError::UnsupportedRole {
                    role: other.role().to_string(),
                });
            }
        }
    }

    Ok(messages)
}

fn convert_user_message(parts: &[UserPart]) -> Result<OllamaChatMessage, ProviderError> {
    let mut message = OllamaChatMessage::text(OllamaRole::User, String::new());

    for part in parts {
        match part {
            UserPart::Text { text } => message.content.push_str(text),
            UserPart::Image {
                image: ImageData::Bytes(bytes),
                ..
            } => message.images.get_or_insert_with(Vec::new).push(STANDARD.encode(bytes)),
            UserPart::Image {
                image: ImageData::Url(_), ..
            } => return Err(ProviderError::unsupported("image-part")),
            _ => return Err(ProviderError::unsupported("user-part")),
        }
    }

    Ok(message)
}

fn convert_assistant_message(parts: &[AssistantPart]) -> OllamaChatMessage {
    let content: String = parts
        .iter()
        .filter_map(|part| match part {
            AssistantPart::Text { text } => Some(text.as_str()),
            _ => None,
        })
        .collect();

    OllamaChatMessage::text(OllamaRole::Assistant, content)
}

fn convert_tool_result(part: &ToolResultPart) -> OllamaChatMessage {
    let content = match &part.result {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    };

    OllamaChatMessage {
        role: OllamaRole::Tool,
        content,
        images: None,
        tool_call_id: Some(part.tool_call_id.clone()),
    }
}
