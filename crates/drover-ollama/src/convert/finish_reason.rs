use drover_provider::FinishReason;

/// Map Ollama's completion status onto the normalized finish reason
///
/// Ollama only ever reports a generic `stop`; anything else, including no
/// status at all, is [`FinishReason::Other`].
pub fn map_ollama_finish_reason(reason: Option<&str>) -> FinishReason {
    match reason {
        Some("stop") => FinishReason::Stop,
        _ => FinishReason::Other,
    }
}
