#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod args;

use std::io::Write;

use args::Args;
use clap::Parser;
use drover_config::Config;
use drover_ollama::{Ollama, OllamaChatModel};
use drover_provider::{CallOptions, LanguageModel, Message, StreamPart};
use futures_util::StreamExt;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    drover_telemetry::init(&config.logging)?;

    let ollama = Ollama::from_config(&config.ollama)?;
    let model_id = args.model.clone().unwrap_or_else(|| config.ollama.chat.model.clone());
    let model = ollama.chat(model_id, config.ollama.chat.settings.clone());

    tracing::info!(base_url = %ollama.base_url(), model = %model.model_id(), "starting drover");

    let mut prompt = Vec::with_capacity(2);
    if let Some(system) = args.system {
        prompt.push(Message::system(system));
    }
    prompt.push(Message::user(args.prompt));

    // Cancel the in-flight call on Ctrl+C
    let cancel = CancellationToken::new();
    let cancel_clone = cancel.clone();
    tokio::spawn(async move {
        interrupt_signal().await;
        cancel_clone.cancel();
    });

    let mut options = CallOptions::new(prompt);
    options.temperature = args.temperature;
    options.abort_signal = Some(cancel);

    if args.no_stream {
        generate(&model, options).await
    } else {
        stream(&model, options).await
    }
}

async fn generate(model: &OllamaChatModel, options: CallOptions) -> anyhow::Result<()> {
    let result = model.do_generate(options).await?;

    for warning in &result.warnings {
        tracing::warn!(?warning, "setting ignored");
    }

    println!("{}", result.text.unwrap_or_default());

    tracing::info!(
        finish_reason = ?result.finish_reason,
        prompt_tokens = result.usage.prompt_tokens,
        completion_tokens = result.usage.completion_tokens,
        "generation finished"
    );
    Ok(())
}

async fn stream(model: &OllamaChatModel, options: CallOptions) -> anyhow::Result<()> {
    let result = model.do_stream(options).await?;

    for warning in &result.warnings {
        tracing::warn!(?warning, "setting ignored");
    }

    let mut parts = result.stream;
    while let Some(part) = parts.next().await {
        match part {
            StreamPart::TextDelta { text_delta } => {
                let mut stdout = std::io::stdout();
                stdout.write_all(text_delta.as_bytes())?;
                stdout.flush()?;
            }
            StreamPart::Error { error } if error.is_cancelled() => {
                println!();
                tracing::info!("generation cancelled");
                return Ok(());
            }
            StreamPart::Error { error } => {
                tracing::warn!(error = %error, "stream error");
            }
            StreamPart::Finish { finish_reason, usage } => {
                println!();
                tracing::info!(
                    finish_reason = ?finish_reason,
                    prompt_tokens = usage.prompt_tokens,
                    completion_tokens = usage.completion_tokens,
                    "generation finished"
                );
            }
        }
    }

    Ok(())
}

/// Wait for `SIGINT`
async fn interrupt_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }

    tracing::info!("interrupt received");
}
