//! Ollama chat model

use std::pin::Pin;

use async_trait::async_trait;
use drover_config::ChatSettings;
use drover_provider::{
    CallOptions, CallWarning, FinishReason, FunctionTool, GenerateResult, LanguageModel, Mode, ObjectGenerationMode,
    PartStream, ProviderError, RawCall, RawResponse, RequestEcho, ResponseFormat, StreamPart, StreamResult, ToolChoice,
    Usage,
};
use futures_util::{Stream, StreamExt, stream};
use tokio_util::sync::CancellationToken;

use crate::api::{ApiClient, ApiResponse};
use crate::convert::{convert_to_ollama_chat_messages, map_ollama_finish_reason};
use crate::protocol::{OllamaChatRequest, OllamaChatResponse, OllamaFormat, OllamaOptions, OllamaStreamChunk};
use crate::stream::decode_json_lines;

const PROVIDER: &str = "ollama.chat";

/// Request built from call options, plus the settings that were ignored
#[derive(Debug, Clone)]
pub struct ChatArguments {
    /// Wire request, `stream` left unset
    pub request: OllamaChatRequest,
    /// Unsupported settings that were dropped
    pub warnings: Vec<CallWarning>,
}

/// Chat model served by an Ollama daemon
#[derive(Debug, Clone)]
pub struct OllamaChatModel {
    model_id: String,
    settings: ChatSettings,
    api: ApiClient,
}

impl OllamaChatModel {
    pub(crate) fn new(model_id: impl Into<String>, settings: ChatSettings, api: ApiClient) -> Self {
        Self {
            model_id: model_id.into(),
            settings,
            api,
        }
    }

    /// Per-instance settings
    pub const fn settings(&self) -> &ChatSettings {
        &self.settings
    }

    /// Build the wire request for `options`
    ///
    /// Fails before anything is sent when the mode cannot be expressed in
    /// Ollama's chat protocol.
    pub fn get_arguments(&self, options: &CallOptions) -> Result<ChatArguments, ProviderError> {
        let mut warnings = Vec::new();

        let (tools, mut format): (&[FunctionTool], Option<OllamaFormat>) = match &options.mode {
            Mode::Regular { tools, tool_choice } => {
                if let Some(choice) = tool_choice
                    && *choice != ToolChoice::Auto
                {
                    warnings.push(CallWarning::UnsupportedSetting {
                        setting: "tool_choice".to_owned(),
                        details: Some("only automatic tool selection is supported".to_owned()),
                    });
                }
                (tools.as_slice(), None)
            }
            Mode::ObjectJson { schema, .. } => {
                if schema.is_some() {
                    warnings.push(CallWarning::UnsupportedSetting {
                        setting: "schema".to_owned(),
                        details: Some("JSON schemas are not supported; plain JSON mode is used".to_owned()),
                    });
                }
                (&[][..], Some(OllamaFormat::Json))
            }
            Mode::ObjectTool { .. } => return Err(ProviderError::unsupported("object-tool mode")),
            Mode::ObjectGrammar { .. } => return Err(ProviderError::unsupported("object-grammar mode")),
            other => return Err(ProviderError::unsupported(format!("{} mode", other.name()))),
        };

        if let Some(ResponseFormat::Json { schema, .. }) = &options.response_format {
            format = Some(OllamaFormat::Json);
            if schema.is_some() {
                warnings.push(CallWarning::UnsupportedSetting {
                    setting: "response_format".to_owned(),
                    details: Some("JSON schemas are not supported; plain JSON mode is used".to_owned()),
                });
            }
        }

        let settings = &self.settings;
        let request = OllamaChatRequest {
            model: self.model_id.clone(),
            messages: convert_to_ollama_chat_messages(&options.prompt, tools)?,
            format,
            options: OllamaOptions {
                frequency_penalty: options.frequency_penalty,
                mirostat: settings.mirostat,
                mirostat_eta: settings.mirostat_eta,
                mirostat_tau: settings.mirostat_tau,
                num_ctx: settings.num_ctx,
                num_predict: options.max_tokens,
                presence_penalty: options.presence_penalty,
                repeat_last_n: settings.repeat_last_n,
                repeat_penalty: settings.repeat_penalty,
                seed: options.seed,
                stop: settings.stop.clone().or_else(|| options.stop_sequences.clone()),
                temperature: options.temperature,
                tfs_z: settings.tfs_z,
                top_k: settings.top_k.or(options.top_k),
                top_p: options.top_p,
            },
            stream: None,
        };

        Ok(ChatArguments { request, warnings })
    }
}

#[async_trait]
impl LanguageModel for OllamaChatModel {
    fn provider(&self) -> &str {
        PROVIDER
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn default_object_generation_mode(&self) -> Option<ObjectGenerationMode> {
        Some(ObjectGenerationMode::Json)
    }

    fn supports_image_urls(&self) -> bool {
        false
    }

    async fn do_generate(&self, options: CallOptions) -> Result<GenerateResult, ProviderError> {
        let ChatArguments { mut request, warnings } = self.get_arguments(&options)?;
        request.stream = Some(false);

        let (body, raw_call) = encode_request(&request)?;

        tracing::debug!(model = %self.model_id, stream = false, "sending chat request");

        let response: ApiResponse<OllamaChatResponse> = self
            .api
            .post_json("/chat", body.clone(), &options.headers, options.abort_signal.as_ref())
            .await?;

        Ok(GenerateResult {
            text: Some(response.value.message.content),
            finish_reason: map_ollama_finish_reason(Some("stop")),
            usage: Usage::from_counts(response.value.prompt_eval_count, None),
            raw_call,
            raw_response: RawResponse {
                headers: response.headers,
            },
            request: RequestEcho { body },
            warnings,
        })
    }

    async fn do_stream(&self, options: CallOptions) -> Result<StreamResult, ProviderError> {
        let ChatArguments { request, warnings } = self.get_arguments(&options)?;

        let (body, raw_call) = encode_request(&request)?;

        tracing::debug!(model = %self.model_id, stream = true, "sending chat request");

        let abort = options.abort_signal.clone().unwrap_or_default();
        let (headers, bytes) = self
            .api
            .post_stream("/chat", body.clone(), &options.headers, Some(&abort))
            .await?;

        let chunks = decode_json_lines::<OllamaStreamChunk, _>(bytes);

        Ok(StreamResult {
            stream: reduce_stream(chunks, abort),
            raw_call,
            raw_response: RawResponse { headers },
            request: RequestEcho { body },
            warnings,
        })
    }
}

/// Serialize the request, splitting the messages out as the raw prompt
fn encode_request(request: &OllamaChatRequest) -> Result<(String, RawCall), ProviderError> {
    let mut value = serde_json::to_value(request).map_err(|e| ProviderError::InvalidArgument {
        argument: "request".to_owned(),
        message: e.to_string(),
    })?;

    let body = value.to_string();
    let raw_prompt = value
        .as_object_mut()
        .and_then(|fields| fields.remove("messages"))
        .unwrap_or_default();

    Ok((
        body,
        RawCall {
            raw_prompt,
            raw_settings: value,
        },
    ))
}

// -- Stream reduction --

/// Finish reason and usage accumulated over one streaming call
#[derive(Debug)]
struct StreamReducer {
    finish_reason: FinishReason,
    usage: Usage,
}

impl Default for StreamReducer {
    fn default() -> Self {
        Self {
            finish_reason: FinishReason::Other,
            usage: Usage::UNKNOWN,
        }
    }
}

impl StreamReducer {
    /// Fold one decoded record, returning the part to emit, if any
    fn apply(&mut self, item: Result<OllamaStreamChunk, ProviderError>) -> Option<StreamPart> {
        match item {
            Err(error) => {
                tracing::debug!(error = %error, "chat stream record could not be decoded");
                Some(StreamPart::Error { error })
            }
            Ok(OllamaStreamChunk::Delta(delta)) => delta
                .message
                .content
                .map(|text_delta| StreamPart::TextDelta { text_delta }),
            Ok(OllamaStreamChunk::Done(done)) => {
                self.finish_reason = map_ollama_finish_reason(Some("stop"));
                // Prompt count on the terminal record is not surfaced
                self.usage = Usage::from_counts(None, Some(done.eval_count));
                None
            }
        }
    }

    const fn finish(&self) -> StreamPart {
        StreamPart::Finish {
            finish_reason: self.finish_reason,
            usage: self.usage,
        }
    }
}

type ChunkStream = Pin<Box<dyn Stream<Item = Result<OllamaStreamChunk, ProviderError>> + Send>>;

struct ReduceState {
    chunks: ChunkStream,
    reducer: StreamReducer,
    abort: CancellationToken,
    done: bool,
}

enum Step {
    Cancelled,
    Item(Result<OllamaStreamChunk, ProviderError>),
    End,
}

/// Reduce decoded records into caller-facing parts
///
/// Ends with exactly one finish part, or with a single cancellation error
/// part when `abort` fires first.
fn reduce_stream<S>(chunks: S, abort: CancellationToken) -> PartStream
where
    S: Stream<Item = Result<OllamaStreamChunk, ProviderError>> + Send + 'static,
{
    let state = ReduceState {
        chunks: Box::pin(chunks),
        reducer: StreamReducer::default(),
        abort,
        done: false,
    };

    Box::pin(stream::unfold(state, |mut state| async move {
        if state.done {
            return None;
        }

        loop {
            let step = tokio::select! {
                biased;
                () = state.abort.cancelled() => Step::Cancelled,
                next = state.chunks.next() => next.map_or(Step::End, Step::Item),
            };

            match step {
                Step::Cancelled => {
                    tracing::debug!("chat stream cancelled");
                    state.done = true;
                    // Drop the response body so the connection closes now
                    state.chunks = Box::pin(stream::empty());
                    return Some((
                        StreamPart::Error {
                            error: ProviderError::Cancelled,
                        },
                        state,
                    ));
                }
                Step::Item(item) => {
                    if let Some(part) = state.reducer.apply(item) {
                        return Some((part, state));
                    }
                }
                Step::End => {
                    state.done = true;
                    let part = state.reducer.finish();
                    return Some((part, state));
                }
            }
        }
    }))
}
