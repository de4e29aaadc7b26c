//! Drop-in adapters for pipeline code that used to run generation models locally
//!
//! Each adapter keeps the `(prompt, arguments) -> response` call shape and
//! forwards to the hosted service with a fixed task kind.

pub mod flux;
pub mod video;

use std::marker::PhantomData;

use mosaic_config::TaskKind;
use serde_json::Value;

pub use flux::FluxFalAdapter;
pub use video::VideoFalAdapter;

use crate::{
    Arguments, MediaService, Result,
    client::{FalClient, MediaClient},
};

/// Task kind an adapter generates
pub trait AdapterTask {
    const KIND: TaskKind;
}

/// Marker for image adapters
#[derive(Debug)]
pub struct ImageTask;

impl AdapterTask for ImageTask {
    const KIND: TaskKind = TaskKind::Image;
}

/// Marker for video adapters
#[derive(Debug)]
pub struct VideoTask;

impl AdapterTask for VideoTask {
    const KIND: TaskKind = TaskKind::Video;
}

/// Adapter bound to a task kind and, optionally, a model id
///
/// The model id is fixed at construction. With none, every call resolves the
/// configured model for the task kind.
#[derive(Debug)]
pub struct FalAdapter<K, C = FalClient> {
    model_id: Option<String>,
    service: MediaService<C>,
    task: PhantomData<fn() -> K>,
}

impl<K: AdapterTask> FalAdapter<K> {
    /// Create an adapter backed by a fal.ai client from the environment
    pub fn new(model_id: Option<String>) -> Result<Self> {
        Ok(Self::with_service(model_id, MediaService::new(FalClient::from_env()?)))
    }
}

impl<K: AdapterTask, C: MediaClient> FalAdapter<K, C> {
    /// Create an adapter over an existing service
    pub fn with_service(model_id: Option<String>, service: MediaService<C>) -> Self {
        Self {
            model_id,
            service,
            task: PhantomData,
        }
    }

    /// Bound model id
    pub fn model_id(&self) -> Option<&str> {
        self.model_id.as_deref()
    }

    /// Underlying service
    pub fn service(&self) -> &MediaService<C> {
        &self.service
    }

    /// Generate with the bound model
    pub fn call(&self, prompt: &str, arguments: Option<Arguments>) -> Result<Value> {
        self.service
            .generate(K::KIND, prompt, self.model_id.as_deref(), arguments)
    }
}
