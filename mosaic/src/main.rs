#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod args;

use args::{Args, AudioArgs, ChatArgs, Command, GenerateArgs, into_object};
use clap::Parser;
use mosaic_config::{ModelResolver, TaskKind};
use mosaic_llm::{ChatMessage, ChatOptions};
use mosaic_media::{AsyncFalClient, FalClient, MediaService};
use serde_json::Value;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    mosaic_telemetry::init(&args.log_filter, args.log_format)?;

    let resolver = ModelResolver::new(&args.models_config);

    tracing::debug!(models_config = %resolver.path().display(), "starting mosaic");

    match args.command {
        Command::Image(generate) => print_json(&run_generation(TaskKind::Image, generate, resolver)?),
        Command::Video(generate) => print_json(&run_generation(TaskKind::Video, generate, resolver)?),
        Command::Audio(audio) => print_json(&run_audio(audio, resolver)?),
        Command::Chat(chat) => {
            println!("{}", run_chat(chat)?);
            Ok(())
        }
    }
}

/// Run an image or video generation, through the queue when requested
fn run_generation(kind: TaskKind, args: GenerateArgs, resolver: ModelResolver) -> anyhow::Result<Value> {
    let GenerateArgs {
        prompt,
        model,
        arguments,
        use_queue,
        logs,
    } = args;
    let arguments = into_object(arguments);
    let model = model.as_deref();

    if !use_queue {
        let service = MediaService::new(FalClient::from_env()?).with_resolver(resolver);
        return Ok(service.generate(kind, &prompt, model, arguments)?);
    }

    let service = MediaService::new(AsyncFalClient::from_env()?).with_resolver(resolver);

    // One cooperative task; nothing else runs on this runtime
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let response = runtime.block_on(service.generate_async(kind, &prompt, model, arguments, logs))?;

    Ok(response)
}

fn run_audio(args: AudioArgs, resolver: ModelResolver) -> anyhow::Result<Value> {
    // An unconfigured model short-circuits before any client settings are read
    let model_id = resolver.resolve(TaskKind::Audio, args.model.as_deref());
    if model_id.is_empty() {
        return Ok(mosaic_media::unconfigured_audio_response());
    }

    let service = MediaService::new(FalClient::from_env()?).with_resolver(resolver);
    Ok(service.generate_audio(Some(&model_id), into_object(args.arguments))?)
}

fn run_chat(args: ChatArgs) -> anyhow::Result<String> {
    let mut messages = Vec::with_capacity(2);
    if let Some(system) = &args.system {
        messages.push(ChatMessage::system(system));
    }
    messages.push(ChatMessage::user(&args.message));

    let options = ChatOptions {
        temperature: args.temperature,
        max_tokens: args.max_tokens,
        extra: into_object(args.options).unwrap_or_default(),
        ..ChatOptions::default()
    };

    Ok(mosaic_llm::chat(&messages, args.model.as_deref(), Some(options))?)
}

fn print_json(value: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
