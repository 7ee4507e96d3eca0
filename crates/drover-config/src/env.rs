use std::borrow::Cow;
use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Matches `{{ env.VAR }}` and `{{ env.VAR | default("fallback") }}`
fn placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"\{\{\s*([A-Za-z0-9_.]+)\s*(?:\|\s*default\("([^"]*)"\)\s*)?\}\}"#).expect("must be valid regex")
    })
}

/// Expand environment placeholders in raw TOML text
///
/// Only the `env.` scope exists. A missing variable without a default is an
/// error. Comment lines are copied verbatim.
pub fn expand_env(input: &str) -> Result<String, String> {
    let mut failure: Option<String> = None;

    let lines: Vec<Cow<'_, str>> = input
        .split('\n')
        .map(|line| {
            if failure.is_some() || line.trim_start().starts_with('#') {
                return Cow::Borrowed(line);
            }

            placeholder().replace_all(line, |caps: &Captures<'_>| {
                let fallback = caps.get(2).map(|m| m.as_str());
                resolve(&caps[1], fallback).unwrap_or_else(|e| {
                    failure.get_or_insert(e);
                    String::new()
                })
            })
        })
        .collect();

    match failure {
        Some(e) => Err(e),
        None => Ok(lines.join("\n")),
    }
}

fn resolve(key: &str, fallback: Option<&str>) -> Result<String, String> {
    let var_name = key
        .strip_prefix("env.")
        .filter(|name| !name.is_empty() && !name.contains('.'))
        .ok_or_else(|| format!("only variables scoped with 'env.' are supported: `{key}`"))?;

    match (std::env::var(var_name), fallback) {
        (Ok(value), _) => Ok(value),
        (Err(_), Some(default)) => Ok(default.to_owned()),
        (Err(_), None) => Err(format!("environment variable not found: `{var_name}`")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_without_placeholders_is_unchanged() {
        let input = "[ollama]\nbase_url = \"http://localhost:11434/api\"\n";
        assert_eq!(expand_env(input).unwrap(), input);
    }

    #[test]
    fn expands_base_url_from_env() {
        temp_env::with_var("OLLAMA_HOST", Some("http://gpu-box:11434"), || {
            let result = expand_env("base_url = \"{{ env.OLLAMA_HOST }}/api\"").unwrap();
            assert_eq!(result, "base_url = \"http://gpu-box:11434/api\"");
        });
    }

    #[test]
    fn expands_several_placeholders_on_one_line() {
        let vars = [("DROVER_A", Some("a")), ("DROVER_B", Some("b"))];
        temp_env::with_vars(vars, || {
            let result = expand_env("x = \"{{ env.DROVER_A }}-{{env.DROVER_B}}\"").unwrap();
            assert_eq!(result, "x = \"a-b\"");
        });
    }

    #[test]
    fn missing_variable_is_an_error() {
        temp_env::with_var_unset("DROVER_MISSING", || {
            let err = expand_env("token = \"{{ env.DROVER_MISSING }}\"").unwrap_err();
            assert!(err.contains("DROVER_MISSING"));
        });
    }

    #[test]
    fn default_applies_only_when_unset() {
        temp_env::with_var_unset("DROVER_MODEL", || {
            let result = expand_env("model = \"{{ env.DROVER_MODEL | default(\"llama3.2\") }}\"").unwrap();
            assert_eq!(result, "model = \"llama3.2\"");
        });
        temp_env::with_var("DROVER_MODEL", Some("mistral"), || {
            let result = expand_env("model = \"{{ env.DROVER_MODEL | default(\"llama3.2\") }}\"").unwrap();
            assert_eq!(result, "model = \"mistral\"");
        });
    }

    #[test]
    fn other_scopes_are_rejected() {
        let err = expand_env("x = \"{{ secrets.TOKEN }}\"").unwrap_err();
        assert!(err.contains("only variables scoped with 'env.'"));
    }

    #[test]
    fn comment_lines_are_not_expanded() {
        temp_env::with_var_unset("DROVER_MISSING", || {
            let input = "  # token = \"{{ env.DROVER_MISSING }}\"\nmodel = \"x\"";
            assert_eq!(expand_env(input).unwrap(), input);
        });
    }
}
