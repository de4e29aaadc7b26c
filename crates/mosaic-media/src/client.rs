//! Remote media client seams and the fal.ai implementations

mod fal;
mod queue;

use std::pin::Pin;

use async_trait::async_trait;
use futures_util::Stream;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use url::Url;

pub use fal::FalClient;
pub use queue::AsyncFalClient;

use crate::{
    error::{MediaError, Result},
    types::{Arguments, QueueStatus},
};

/// Stream of progress events for a submitted job
pub type EventStream<'a> = Pin<Box<dyn Stream<Item = Result<QueueStatus>> + Send + 'a>>;

/// Synchronous access to hosted models
pub trait MediaClient: Send + Sync {
    /// Run a model and block until its result is available
    fn run(&self, model_id: &str, arguments: &Arguments) -> Result<Value>;
}

/// Queue-based asynchronous access to hosted models
#[async_trait]
pub trait AsyncMediaClient: Send + Sync {
    /// Submit a job, returning a handle to the in-flight request
    async fn submit(&self, model_id: &str, arguments: &Arguments) -> Result<Box<dyn Submission>>;
}

/// Handle to an in-flight asynchronous job
#[async_trait]
pub trait Submission: Send + Sync {
    /// Identifier assigned by the service
    fn request_id(&self) -> &str;

    /// Progress events until the job completes
    ///
    /// The stream ends after yielding the completion event, or after the
    /// first error.
    fn events(&self, with_logs: bool) -> EventStream<'_>;

    /// Fetch the final result of a completed job
    async fn get(&self) -> Result<Value>;
}

/// Join a base URL and a model id into an endpoint URL
fn endpoint_url(base: &Url, model_id: &str) -> String {
    format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        model_id.trim_start_matches('/')
    )
}

/// Value for the `Authorization` header
fn authorization(api_key: Option<&SecretString>) -> Result<String> {
    let api_key = api_key.ok_or(MediaError::MissingCredentials)?;
    Ok(format!("Key {}", api_key.expose_secret()))
}

/// Build an API error from a failed response body
///
/// fal.ai reports errors as `{"detail": ...}` where the detail is either a
/// message or a list of validation errors.
fn api_error(status: u16, body: &str) -> MediaError {
    let message = match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(object)) => match object.get("detail") {
            Some(Value::String(detail)) => detail.clone(),
            Some(detail) => detail.to_string(),
            None => body.to_owned(),
        },
        _ => body.to_owned(),
    };

    MediaError::Api { status, message }
}
