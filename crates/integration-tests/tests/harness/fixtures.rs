//! Canned Ollama response bodies

use serde_json::json;

/// Complete non-streaming chat response
pub fn chat_response(content: &str, eval_count: u64, prompt_eval_count: u64) -> serde_json::Value {
    json!({
        "model": "llama3.2",
        "created_at": "2024-06-01T12:00:00.000000Z",
        "message": {"role": "assistant", "content": content},
        "done": true,
        "done_reason": "stop",
        "total_duration": 1_000_000_u64,
        "eval_count": eval_count,
        "eval_duration": 500_000_u64,
        "prompt_eval_count": prompt_eval_count
    })
}

/// One non-terminal streaming line, newline included
pub fn delta_line(content: &str) -> String {
    let record = json!({
        "model": "llama3.2",
        "created_at": "2024-06-01T12:00:00.000000Z",
        "message": {"role": "assistant", "content": content},
        "done": false
    });
    format!("{record}\n")
}

/// Terminal streaming line, newline included
pub fn done_line(eval_count: u64, prompt_eval_count: u64) -> String {
    let record = json!({
        "model": "llama3.2",
        "created_at": "2024-06-01T12:00:01.000000Z",
        "message": {"role": "assistant", "content": ""},
        "done": true,
        "done_reason": "stop",
        "eval_count": eval_count,
        "eval_duration": 500_000_u64,
        "prompt_eval_count": prompt_eval_count
    });
    format!("{record}\n")
}
