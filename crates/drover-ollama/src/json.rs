//! JSON parsing with syntax and shape errors kept apart

use drover_provider::ProviderError;
use serde::de::DeserializeOwned;

/// Parse `text` as JSON and validate it against `T`
///
/// Malformed JSON yields [`ProviderError::JsonParse`]; well-formed JSON that
/// does not match `T` yields [`ProviderError::TypeValidation`].
pub fn parse_json<T: DeserializeOwned>(text: &str) -> Result<T, ProviderError> {
    let value: serde_json::Value = serde_json::from_str(text).map_err(|e| ProviderError::JsonParse {
        text: text.to_owned(),
        message: e.to_string(),
    })?;

    serde_json::from_value(value).map_err(|e| ProviderError::TypeValidation {
        value: text.to_owned(),
        message: e.to_string(),
    })
}
