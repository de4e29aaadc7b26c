use std::time::Duration;

use async_trait::async_trait;
use futures_util::stream;
use mosaic_config::FalConfig;
use reqwest::{Client, Response, header::AUTHORIZATION};
use serde::Deserialize;
use serde_json::Value;

use super::{AsyncMediaClient, EventStream, Submission, api_error, authorization, endpoint_url};
use crate::{
    error::{MediaError, Result},
    types::{Arguments, QueueStatus},
};

/// Asynchronous fal.ai client for the queue endpoint
#[derive(Debug, Clone)]
pub struct AsyncFalClient {
    http: Client,
    config: FalConfig,
}

impl AsyncFalClient {
    /// Create a client with explicit settings
    pub fn new(config: FalConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    /// Create a client from the process environment
    pub fn from_env() -> Result<Self> {
        let config = FalConfig::from_env().map_err(|e| MediaError::Config(e.to_string()))?;
        Ok(Self::new(config))
    }

    /// Settings in use
    pub fn config(&self) -> &FalConfig {
        &self.config
    }
}

/// Wire format of the queue submission response
#[derive(Deserialize)]
struct QueueSubmitResponse {
    request_id: String,
    status_url: String,
    response_url: String,
}

#[async_trait]
impl AsyncMediaClient for AsyncFalClient {
    async fn submit(&self, model_id: &str, arguments: &Arguments) -> Result<Box<dyn Submission>> {
        let url = endpoint_url(&self.config.queue_url, model_id);
        let auth = authorization(self.config.api_key.as_ref())?;

        tracing::debug!(model_id, url = %url, "submitting fal job");

        let response = self
            .http
            .post(&url)
            .header(AUTHORIZATION, &auth)
            .json(arguments)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(model_id, error = %e, "fal submit request failed");
                MediaError::Http(e)
            })?;

        let submitted: QueueSubmitResponse = check(response)
            .await?
            .json()
            .await
            .map_err(|e| MediaError::Parse(format!("invalid fal submit response: {e}")))?;

        tracing::debug!(model_id, request_id = %submitted.request_id, "fal job queued");

        Ok(Box::new(FalSubmission {
            http: self.http.clone(),
            auth,
            request_id: submitted.request_id,
            status_url: submitted.status_url,
            response_url: submitted.response_url,
            poll_interval: self.config.poll_interval,
        }))
    }
}

/// In-flight fal.ai queue job
struct FalSubmission {
    http: Client,
    auth: String,
    request_id: String,
    status_url: String,
    response_url: String,
    poll_interval: Duration,
}

/// Where the status poller stands
#[derive(Clone, Copy)]
enum PollState {
    First,
    Again,
    Finished,
}

impl FalSubmission {
    /// Fetch the current job status once
    async fn status(&self, with_logs: bool) -> Result<QueueStatus> {
        let response = self
            .http
            .get(&self.status_url)
            .query(&[("logs", u8::from(with_logs))])
            .header(AUTHORIZATION, &self.auth)
            .send()
            .await?;

        check(response)
            .await?
            .json()
            .await
            .map_err(|e| MediaError::Parse(format!("invalid fal status response: {e}")))
    }
}

#[async_trait]
impl Submission for FalSubmission {
    fn request_id(&self) -> &str {
        &self.request_id
    }

    fn events(&self, with_logs: bool) -> EventStream<'_> {
        Box::pin(stream::unfold(PollState::First, move |poll| async move {
            match poll {
                PollState::Finished => None,
                PollState::First | PollState::Again => {
                    if matches!(poll, PollState::Again) {
                        tokio::time::sleep(self.poll_interval).await;
                    }

                    match self.status(with_logs).await {
                        Ok(status) => {
                            let next = if status.is_completed() { PollState::Finished } else { PollState::Again };
                            Some((Ok(status), next))
                        }
                        Err(e) => Some((Err(e), PollState::Finished)),
                    }
                }
            }
        }))
    }

    async fn get(&self) -> Result<Value> {
        let response = self
            .http
            .get(&self.response_url)
            .header(AUTHORIZATION, &self.auth)
            .send()
            .await?;

        let result: Value = check(response)
            .await?
            .json()
            .await
            .map_err(|e| MediaError::Parse(format!("invalid fal result: {e}")))?;

        tracing::debug!(request_id = %self.request_id, "fal job result fetched");

        Ok(result)
    }
}

/// Turn a non-2xx response into an API error
async fn check(response: Response) -> Result<Response> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::warn!(status = %status, "fal queue returned error");

    Err(api_error(status.as_u16(), &body))
}
