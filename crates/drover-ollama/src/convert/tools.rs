use drover_provider::{FunctionTool, ProviderError};

const TOOLS_PREAMBLE: &str = "You have access to the following tools:";

const TOOLS_INSTRUCTION: &str = "To call one or more tools, respond only with a JSON array of the form \
[{\"name\": \"<tool name>\", \"arguments\": {<arguments object>}}] and nothing else.";

/// Append the declared tool schemas to a system message
///
/// Ollama has no tool field on chat requests, so callable tools are described
/// to the model in the system text. Returns `system` unchanged when `tools`
/// is empty.
pub fn inject_tools_into_system_message(system: &str, tools: &[FunctionTool]) -> Result<String, ProviderError> {
    if tools.is_empty() {
        return Ok(system.to_owned());
    }

    let schemas = serde_json::to_string(tools).map_err(|e| ProviderError::InvalidArgument {
        argument: "tools".to_owned(),
        message: e.to_string(),
    })?;

    let mut lines = Vec::with_capacity(5);
    if !system.is_empty() {
        lines.push(system);
        lines.push("");
    }
    lines.extend([TOOLS_PREAMBLE, schemas.as_str(), TOOLS_INSTRUCTION]);

    Ok(lines.join("\n"))
}
