use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use mosaic_config::DEFAULT_MODELS_PATH;
use mosaic_telemetry::LogFormat;
use serde_json::{Map, Value};

/// Mosaic media and chat adapter
#[derive(Debug, Parser)]
#[command(name = "mosaic", about = "Generate images, video and audio with fal.ai, or chat with OpenAI")]
pub struct Args {
    /// Path to the model configuration file
    #[arg(long, default_value = DEFAULT_MODELS_PATH, env = "MOSAIC_MODELS_CONFIG", global = true)]
    pub models_config: PathBuf,

    /// Log filter directives
    #[arg(long, default_value = "warn", env = "MOSAIC_LOG", global = true)]
    pub log_filter: String,

    /// Log line format
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate an image from a prompt
    Image(GenerateArgs),
    /// Generate a video from a prompt
    Video(GenerateArgs),
    /// Generate or transcribe audio
    Audio(AudioArgs),
    /// Send a chat message and print the reply
    Chat(ChatArgs),
}

#[derive(Debug, ClapArgs)]
pub struct GenerateArgs {
    /// Text prompt
    pub prompt: String,

    /// Model id override
    #[arg(long)]
    pub model: Option<String>,

    /// Extra model argument; the value is parsed as JSON, falling back to a string
    #[arg(long = "arg", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub arguments: Vec<(String, Value)>,

    /// Use the queue and wait for completion instead of the synchronous endpoint
    #[arg(long = "async")]
    pub use_queue: bool,

    /// Request log lines with queue progress events
    #[arg(long, requires = "use_queue")]
    pub logs: bool,
}

#[derive(Debug, ClapArgs)]
pub struct AudioArgs {
    /// Model id override
    #[arg(long)]
    pub model: Option<String>,

    /// Model argument; the value is parsed as JSON, falling back to a string
    #[arg(long = "arg", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub arguments: Vec<(String, Value)>,
}

#[derive(Debug, ClapArgs)]
pub struct ChatArgs {
    /// User message
    pub message: String,

    /// System message sent before the user message
    #[arg(long)]
    pub system: Option<String>,

    /// Model name
    #[arg(long)]
    pub model: Option<String>,

    /// Sampling temperature
    #[arg(long)]
    pub temperature: Option<f64>,

    /// Maximum tokens to generate
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Additional completion option; the value is parsed as JSON, falling back to a string
    #[arg(long = "option", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub options: Vec<(String, Value)>,
}

/// Collect `KEY=VALUE` pairs into a JSON object
pub fn into_object(pairs: Vec<(String, Value)>) -> Option<Map<String, Value>> {
    if pairs.is_empty() {
        None
    } else {
        Some(pairs.into_iter().collect())
    }
}

/// Parse `KEY=VALUE`, reading the value as JSON when possible
fn parse_key_value(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{raw}`"))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in `{raw}`"));
    }

    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_owned()));

    Ok((key.to_owned(), value))
}
