use serde_json::Value;

use super::{FalAdapter, ImageTask};
use crate::{Arguments, Result, client::FalClient};

/// Generate an image with the hosted service in place of a local Flux pipeline
///
/// `arguments` carries model-specific fields such as `image_size`,
/// `guidance_scale` or `seed`. Returns the service response, which holds the
/// image URLs.
pub fn generate_image(prompt: &str, model_id: Option<&str>, arguments: Option<Arguments>) -> Result<Value> {
    crate::generate_image(prompt, model_id, arguments)
}

/// Image adapter bound to a model id at construction
pub type FluxFalAdapter<C = FalClient> = FalAdapter<ImageTask, C>;
