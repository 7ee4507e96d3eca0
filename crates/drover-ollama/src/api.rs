//! HTTP plumbing shared by the chat and embedding models

use std::collections::HashMap;
use std::pin::Pin;

use bytes::Bytes;
use drover_provider::ProviderError;
use futures_util::{Stream, StreamExt};
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::json::parse_json;
use crate::protocol::OllamaErrorResponse;

/// Raw response body chunks
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, ProviderError>> + Send>>;

/// Parsed JSON response together with its headers
#[derive(Debug)]
pub struct ApiResponse<T> {
    pub value: T,
    pub headers: HashMap<String, String>,
}

/// Client for one Ollama base URL
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    headers: HeaderMap,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, headers: HeaderMap) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            headers,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// POST a JSON body and parse the JSON response
    pub async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: String,
        call_headers: &HeaderMap,
        abort: Option<&CancellationToken>,
    ) -> Result<ApiResponse<T>, ProviderError> {
        let url = self.url(path);

        let response = cancellable(abort, self.send(&url, body, call_headers)).await?;
        let headers = extract_headers(response.headers());

        let text = cancellable(abort, async {
            response.text().await.map_err(|e| transport_error(&url, &e))
        })
        .await?;

        Ok(ApiResponse {
            value: parse_json(&text)?,
            headers,
        })
    }

    /// POST a JSON body and hand back the response body as a byte stream
    ///
    /// Resolves once response headers have arrived.
    pub async fn post_stream(
        &self,
        path: &str,
        body: String,
        call_headers: &HeaderMap,
        abort: Option<&CancellationToken>,
    ) -> Result<(HashMap<String, String>, ByteStream), ProviderError> {
        let url = self.url(path);

        let response = cancellable(abort, self.send(&url, body, call_headers)).await?;
        let headers = extract_headers(response.headers());

        let bytes = response
            .bytes_stream()
            .map(move |chunk| chunk.map_err(|e| transport_error(&url, &e)));

        Ok((headers, Box::pin(bytes)))
    }

    async fn send(&self, url: &str, body: String, call_headers: &HeaderMap) -> Result<reqwest::Response, ProviderError> {
        let mut headers = self.headers.clone();
        headers.extend(call_headers.clone());
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        tracing::debug!(url, "dispatching ollama request");

        let response = self
            .http
            .post(url)
            .headers(headers)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(url, error = %e, "ollama request failed");
                transport_error(url, &e)
            })?;

        handle_failed_response(url, response).await
    }
}

/// Race `future` against the caller's cancellation token
///
/// Dropping the losing future aborts the in-flight HTTP exchange.
async fn cancellable<T, F>(abort: Option<&CancellationToken>, future: F) -> Result<T, ProviderError>
where
    F: Future<Output = Result<T, ProviderError>>,
{
    match abort {
        Some(token) => tokio::select! {
            biased;
            () = token.cancelled() => Err(ProviderError::Cancelled),
            result = future => result,
        },
        None => future.await,
    }
}

/// Turn a non-success response into [`ProviderError::ApiCall`]
async fn handle_failed_response(url: &str, response: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = parse_error_body(&body).unwrap_or_else(|| {
        if body.is_empty() {
            status.to_string()
        } else {
            body.clone()
        }
    });

    tracing::warn!(url, status = %status, error = %message, "ollama returned error");

    Err(ProviderError::ApiCall {
        url: url.to_owned(),
        status: status.as_u16(),
        message,
        response_body: body,
        is_retryable: is_retryable_status(status.as_u16()),
    })
}

/// Extract the message from an `{"error": "..."}` body
fn parse_error_body(body: &str) -> Option<String> {
    serde_json::from_str::<OllamaErrorResponse>(body).ok().map(|e| e.error)
}

const fn is_retryable_status(status: u16) -> bool {
    matches!(status, 408 | 409 | 429) || status >= 500
}

fn transport_error(url: &str, error: &reqwest::Error) -> ProviderError {
    ProviderError::Transport {
        url: url.to_owned(),
        message: error.to_string(),
    }
}

/// Response headers with lowercase names; non-UTF-8 values are skipped
fn extract_headers(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| Some((name.as_str().to_owned(), value.to_str().ok()?.to_owned())))
        .collect()
}
