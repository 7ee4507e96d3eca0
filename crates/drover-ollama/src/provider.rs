//! Provider factory

use drover_config::{ChatSettings, EmbeddingSettings, OllamaConfig};
use drover_provider::ProviderError;
use http::{HeaderMap, HeaderName, HeaderValue};

use crate::api::ApiClient;
use crate::chat::OllamaChatModel;
use crate::embedding::OllamaEmbeddingModel;

/// Base URL of a local Ollama daemon
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:11434/api";

/// Connection settings shared by every model created from one provider
#[derive(Debug, Clone, Default)]
pub struct OllamaProviderSettings {
    /// API base URL, [`DEFAULT_BASE_URL`] when unset
    pub base_url: Option<String>,
    /// Headers attached to every request
    pub headers: HeaderMap,
}

/// Creates chat and embedding models that talk to one Ollama endpoint
#[derive(Debug, Clone)]
pub struct Ollama {
    api: ApiClient,
}

impl Ollama {
    pub fn new(settings: OllamaProviderSettings) -> Self {
        let base_url = settings
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_owned();

        Self {
            api: ApiClient::new(base_url, settings.headers),
        }
    }

    /// Build a provider from the `[ollama]` configuration section
    pub fn from_config(config: &OllamaConfig) -> Result<Self, ProviderError> {
        let mut headers = HeaderMap::with_capacity(config.headers.len());
        for (name, value) in &config.headers {
            let header_name = HeaderName::try_from(name.as_str()).map_err(|e| ProviderError::InvalidArgument {
                argument: format!("headers.{name}"),
                message: e.to_string(),
            })?;
            let header_value = HeaderValue::try_from(value.as_str()).map_err(|e| ProviderError::InvalidArgument {
                argument: format!("headers.{name}"),
                message: e.to_string(),
            })?;
            headers.append(header_name, header_value);
        }

        Ok(Self::new(OllamaProviderSettings {
            base_url: config.base_url.as_ref().map(ToString::to_string),
            headers,
        }))
    }

    /// Base URL requests are sent to, without a trailing slash
    pub fn base_url(&self) -> String {
        self.api.url("")
    }

    /// Create a chat model
    pub fn chat(&self, model_id: impl Into<String>, settings: ChatSettings) -> OllamaChatModel {
        OllamaChatModel::new(model_id, settings, self.api.clone())
    }

    /// Alias for [`Ollama::chat`]
    pub fn language_model(&self, model_id: impl Into<String>, settings: ChatSettings) -> OllamaChatModel {
        self.chat(model_id, settings)
    }

    /// Create an embedding model
    pub fn embedding(&self, model_id: impl Into<String>, settings: EmbeddingSettings) -> OllamaEmbeddingModel {
        OllamaEmbeddingModel::new(model_id, settings, self.api.clone())
    }
}

impl Default for Ollama {
    fn default() -> Self {
        Self::new(OllamaProviderSettings::default())
    }
}
