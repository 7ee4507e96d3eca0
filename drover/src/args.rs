use std::path::PathBuf;

use clap::Parser;

/// Drover command line
#[derive(Debug, Parser)]
#[command(name = "drover", about = "Chat with an Ollama model")]
pub struct Args {
    /// Path to configuration file (built-in defaults when omitted)
    #[arg(short, long, env = "DROVER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the configured chat model
    #[arg(short, long, env = "DROVER_MODEL")]
    pub model: Option<String>,

    /// System instruction sent before the prompt
    #[arg(short, long)]
    pub system: Option<String>,

    /// Sampling temperature
    #[arg(short, long)]
    pub temperature: Option<f64>,

    /// Wait for the complete answer instead of streaming it
    #[arg(long)]
    pub no_stream: bool,

    /// Prompt text
    pub prompt: String,
}
