use serde_json::Value;

use super::{FalAdapter, VideoTask};
use crate::{Arguments, Result, client::FalClient};

/// Generate a video with the hosted service
///
/// `arguments` carries model-specific fields such as `duration`,
/// `aspect_ratio` or `seed`. Returns the service response, which holds the
/// video URL.
pub fn generate_video(prompt: &str, model_id: Option<&str>, arguments: Option<Arguments>) -> Result<Value> {
    crate::generate_video(prompt, model_id, arguments)
}

/// Video adapter bound to a model id at construction
pub type VideoFalAdapter<C = FalClient> = FalAdapter<VideoTask, C>;
