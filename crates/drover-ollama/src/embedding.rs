//! Ollama embedding model

use async_trait::async_trait;
use drover_config::EmbeddingSettings;
use drover_provider::{EmbedOptions, EmbedResult, EmbeddingModel, EmbeddingUsage, ProviderError, RawResponse};

use crate::api::{ApiClient, ApiResponse};
use crate::protocol::{OllamaEmbedRequest, OllamaEmbedResponse};

const PROVIDER: &str = "ollama.embedding";

/// Values accepted by one `/embed` call unless configured otherwise
pub const DEFAULT_MAX_EMBEDDINGS_PER_CALL: usize = 2048;

/// Embedding model served by an Ollama daemon
#[derive(Debug, Clone)]
pub struct OllamaEmbeddingModel {
    model_id: String,
    settings: EmbeddingSettings,
    api: ApiClient,
}

impl OllamaEmbeddingModel {
    pub(crate) fn new(model_id: impl Into<String>, settings: EmbeddingSettings, api: ApiClient) -> Self {
        Self {
            model_id: model_id.into(),
            settings,
            api,
        }
    }

    fn max_values(&self) -> usize {
        self.settings
            .max_embeddings_per_call
            .unwrap_or(DEFAULT_MAX_EMBEDDINGS_PER_CALL)
    }
}

#[async_trait]
impl EmbeddingModel for OllamaEmbeddingModel {
    fn provider(&self) -> &str {
        PROVIDER
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn max_embeddings_per_call(&self) -> Option<usize> {
        Some(self.max_values())
    }

    async fn do_embed(&self, values: Vec<String>, options: EmbedOptions) -> Result<EmbedResult, ProviderError> {
        let max = self.max_values();
        if values.len() > max {
            return Err(ProviderError::TooManyEmbeddingValuesForCall {
                model_id: self.model_id.clone(),
                max,
                count: values.len(),
            });
        }

        let count = values.len();
        let request = OllamaEmbedRequest {
            model: self.model_id.clone(),
            input: values,
            truncate: self.settings.truncate,
        };
        let body = serde_json::to_string(&request).map_err(|e| ProviderError::InvalidArgument {
            argument: "values".to_owned(),
            message: e.to_string(),
        })?;

        tracing::debug!(model = %self.model_id, count, "sending embedding request");

        let response: ApiResponse<OllamaEmbedResponse> = self
            .api
            .post_json("/embed", body, &options.headers, options.abort_signal.as_ref())
            .await?;

        if response.value.embeddings.len() != count {
            return Err(ProviderError::InvalidResponseData {
                message: format!(
                    "expected {count} embeddings, got {}",
                    response.value.embeddings.len()
                ),
            });
        }

        Ok(EmbedResult {
            embeddings: response.value.embeddings,
            usage: response
                .value
                .prompt_eval_count
                .map(|tokens| EmbeddingUsage { tokens }),
            raw_response: RawResponse {
                headers: response.headers,
            },
        })
    }
}
