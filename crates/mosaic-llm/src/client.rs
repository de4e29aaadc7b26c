use mosaic_config::OpenAiConfig;
use reqwest::blocking::Client;
use secrecy::ExposeSecret;

use crate::{
    error::{LlmError, Result},
    types::{ChatCompletion, ChatCompletionRequest},
};

/// Remote chat completion capability
pub trait ChatClient: Send + Sync {
    /// Create a completion, blocking until the full response arrives
    fn create_completion(&self, request: &ChatCompletionRequest) -> Result<ChatCompletion>;
}

/// Blocking client for the `OpenAI` chat completions API
#[derive(Debug)]
pub struct OpenAiClient {
    http: Client,
    config: OpenAiConfig,
}

impl OpenAiClient {
    /// Create a client with explicit settings
    pub fn new(config: OpenAiConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    /// Create a client from the process environment
    pub fn from_env() -> Result<Self> {
        let config = OpenAiConfig::from_env().map_err(|e| LlmError::Config(e.to_string()))?;
        Ok(Self::new(config))
    }

    /// Settings in use
    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    /// Build the chat completions URL
    fn completions_url(&self) -> String {
        let base = self.config.base_url.as_str().trim_end_matches('/');
        format!("{base}/chat/completions")
    }
}

impl ChatClient for OpenAiClient {
    fn create_completion(&self, request: &ChatCompletionRequest) -> Result<ChatCompletion> {
        let api_key = self.config.api_key.as_ref().ok_or(LlmError::MissingCredentials)?;
        let body = request.body()?;

        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            "sending chat completion request"
        );

        let mut builder = self
            .http
            .post(self.completions_url())
            .bearer_auth(api_key.expose_secret())
            .json(&body);

        if let Some(organization) = &self.config.organization {
            builder = builder.header("OpenAI-Organization", organization);
        }
        if let Some(project) = &self.config.project {
            builder = builder.header("OpenAI-Project", project);
        }

        let response = builder.send().map_err(|e| {
            tracing::error!(model = %request.model, error = %e, "chat completion request failed");
            LlmError::Http(e)
        })?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            tracing::warn!(model = %request.model, status = %status, "upstream returned error");
            return Err(LlmError::Upstream {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let completion: ChatCompletion = response
            .json()
            .map_err(|e| LlmError::Parse(format!("invalid chat completion: {e}")))?;

        tracing::debug!(model = %completion.model, choices = completion.choices.len(), "chat completion received");

        Ok(completion)
    }
}

/// Pull `error.message` out of an `OpenAI` error body
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| json["error"]["message"].as_str().map(str::to_owned))
        .unwrap_or_else(|| body.to_owned())
}
