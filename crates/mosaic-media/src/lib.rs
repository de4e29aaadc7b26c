#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

//! Media generation through the hosted fal.ai API
//!
//! Model ids come from `config/models.json` unless the caller overrides
//! them. The free functions build a client from the environment on each call;
//! use [`MediaService`] directly to reuse a client or inject a fake one.

pub mod client;
mod error;
pub mod pipeline;
mod service;
mod types;

use serde_json::Value;

pub use client::{AsyncFalClient, AsyncMediaClient, EventStream, FalClient, MediaClient, Submission};
pub use error::{MediaError, Result};
pub use mosaic_config::{ModelResolver, TaskKind};
pub use pipeline::{FluxFalAdapter, VideoFalAdapter};
pub use service::MediaService;
pub use types::{Arguments, LogEntry, QueueStatus, merge_arguments, unconfigured_audio_response};

/// Generate an image and block until the result is ready
pub fn generate_image(prompt: &str, model_id: Option<&str>, arguments: Option<Arguments>) -> Result<Value> {
    MediaService::new(FalClient::from_env()?).generate_image(prompt, model_id, arguments)
}

/// Generate an image through the queue, draining progress events before
/// fetching the result
pub async fn generate_image_async(
    prompt: &str,
    model_id: Option<&str>,
    arguments: Option<Arguments>,
    with_logs: bool,
) -> Result<Value> {
    MediaService::new(AsyncFalClient::from_env()?)
        .generate_image_async(prompt, model_id, arguments, with_logs)
        .await
}

/// Generate a video and block until the result is ready
pub fn generate_video(prompt: &str, model_id: Option<&str>, arguments: Option<Arguments>) -> Result<Value> {
    MediaService::new(FalClient::from_env()?).generate_video(prompt, model_id, arguments)
}

/// Generate a video through the queue
pub async fn generate_video_async(
    prompt: &str,
    model_id: Option<&str>,
    arguments: Option<Arguments>,
    with_logs: bool,
) -> Result<Value> {
    MediaService::new(AsyncFalClient::from_env()?)
        .generate_video_async(prompt, model_id, arguments, with_logs)
        .await
}

/// Generate or transcribe audio
///
/// Set `audio_model_id` in `config/models.json` or pass `model_id`; without
/// either this returns `{"audio": {"url": ""}}`.
pub fn generate_audio(model_id: Option<&str>, arguments: Option<Arguments>) -> Result<Value> {
    // Resolved before the client so the unconfigured case needs no settings
    let model_id = ModelResolver::default().resolve(TaskKind::Audio, model_id);
    if model_id.is_empty() {
        tracing::debug!("no audio model configured, returning empty audio result");
        return Ok(unconfigured_audio_response());
    }

    MediaService::new(FalClient::from_env()?).generate_audio(Some(&model_id), arguments)
}
