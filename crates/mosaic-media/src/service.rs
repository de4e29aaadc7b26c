use futures_util::StreamExt;
use mosaic_config::{ModelResolver, TaskKind};
use serde_json::Value;

use crate::{
    client::{AsyncMediaClient, MediaClient},
    error::Result,
    types::{Arguments, merge_arguments, unconfigured_audio_response},
};

/// Media generation facade
///
/// Resolves the model id for each request, merges the prompt into the
/// caller's arguments and delegates to the remote client. Responses are
/// returned unchanged.
#[derive(Debug, Clone)]
pub struct MediaService<C> {
    client: C,
    resolver: ModelResolver,
}

impl<C> MediaService<C> {
    /// Create a service using the default model configuration path
    pub fn new(client: C) -> Self {
        Self {
            client,
            resolver: ModelResolver::default(),
        }
    }

    /// Replace the model resolver
    #[must_use]
    pub fn with_resolver(mut self, resolver: ModelResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Underlying remote client
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Model resolver in use
    pub fn resolver(&self) -> &ModelResolver {
        &self.resolver
    }

    /// Resolve the model id and build the argument object for a task
    fn prepare(
        &self,
        kind: TaskKind,
        prompt: Option<&str>,
        model_id: Option<&str>,
        arguments: Option<Arguments>,
    ) -> (String, Arguments) {
        let model_id = self.resolver.resolve(kind, model_id);
        let prompt = prompt.filter(|_| kind.takes_prompt());
        (model_id, merge_arguments(prompt, arguments))
    }
}

impl<C: MediaClient> MediaService<C> {
    /// Generate an image, blocking until the result is ready
    pub fn generate_image(&self, prompt: &str, model_id: Option<&str>, arguments: Option<Arguments>) -> Result<Value> {
        self.run(TaskKind::Image, Some(prompt), model_id, arguments)
    }

    /// Generate a video, blocking until the result is ready
    pub fn generate_video(&self, prompt: &str, model_id: Option<&str>, arguments: Option<Arguments>) -> Result<Value> {
        self.run(TaskKind::Video, Some(prompt), model_id, arguments)
    }

    /// Generate or transcribe audio
    ///
    /// No prompt is injected; the caller supplies every argument. When no
    /// audio model is configured and none is given, returns
    /// `{"audio": {"url": ""}}` without contacting the service.
    pub fn generate_audio(&self, model_id: Option<&str>, arguments: Option<Arguments>) -> Result<Value> {
        self.run(TaskKind::Audio, None, model_id, arguments)
    }

    /// Run a generation of the given kind, blocking until the result is ready
    ///
    /// The prompt is dropped for audio, which follows
    /// [`generate_audio`](Self::generate_audio).
    pub fn generate(
        &self,
        kind: TaskKind,
        prompt: &str,
        model_id: Option<&str>,
        arguments: Option<Arguments>,
    ) -> Result<Value> {
        self.run(kind, Some(prompt), model_id, arguments)
    }

    fn run(
        &self,
        kind: TaskKind,
        prompt: Option<&str>,
        model_id: Option<&str>,
        arguments: Option<Arguments>,
    ) -> Result<Value> {
        let (model_id, arguments) = self.prepare(kind, prompt, model_id, arguments);

        if kind == TaskKind::Audio && model_id.is_empty() {
            tracing::debug!("no audio model configured, returning empty audio result");
            return Ok(unconfigured_audio_response());
        }

        tracing::debug!(task = %kind, model_id = %model_id, "running generation");

        self.client.run(&model_id, &arguments)
    }
}

impl<C: AsyncMediaClient> MediaService<C> {
    /// Generate an image through the queue
    ///
    /// `with_logs` asks the service to attach log lines to progress events;
    /// the returned value is the same either way.
    pub async fn generate_image_async(
        &self,
        prompt: &str,
        model_id: Option<&str>,
        arguments: Option<Arguments>,
        with_logs: bool,
    ) -> Result<Value> {
        self.submit_and_wait(TaskKind::Image, prompt, model_id, arguments, with_logs)
            .await
    }

    /// Generate a video through the queue
    pub async fn generate_video_async(
        &self,
        prompt: &str,
        model_id: Option<&str>,
        arguments: Option<Arguments>,
        with_logs: bool,
    ) -> Result<Value> {
        self.submit_and_wait(TaskKind::Video, prompt, model_id, arguments, with_logs)
            .await
    }

    /// Run a generation of the given kind through the queue
    pub async fn generate_async(
        &self,
        kind: TaskKind,
        prompt: &str,
        model_id: Option<&str>,
        arguments: Option<Arguments>,
        with_logs: bool,
    ) -> Result<Value> {
        self.submit_and_wait(kind, prompt, model_id, arguments, with_logs)
            .await
    }

    /// Submit, drain progress events to completion, then fetch the result
    async fn submit_and_wait(
        &self,
        kind: TaskKind,
        prompt: &str,
        model_id: Option<&str>,
        arguments: Option<Arguments>,
        with_logs: bool,
    ) -> Result<Value> {
        let (model_id, arguments) = self.prepare(kind, Some(prompt), model_id, arguments);

        if kind == TaskKind::Audio && model_id.is_empty() {
            tracing::debug!("no audio model configured, returning empty audio result");
            return Ok(unconfigured_audio_response());
        }

        tracing::debug!(task = %kind, model_id = %model_id, "submitting generation");

        let submission = self.client.submit(&model_id, &arguments).await?;

        let mut events = submission.events(with_logs);
        while let Some(event) = events.next().await {
            let status = event?;
            tracing::trace!(request_id = submission.request_id(), ?status, "queue event");
        }
        drop(events);

        submission.get().await
    }
}
