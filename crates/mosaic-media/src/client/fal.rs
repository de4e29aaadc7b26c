use mosaic_config::FalConfig;
use reqwest::{blocking::Client, header::AUTHORIZATION};
use serde_json::Value;

use super::{MediaClient, api_error, authorization, endpoint_url};
use crate::{
    error::{MediaError, Result},
    types::Arguments,
};

/// Blocking fal.ai client for the synchronous run endpoint
///
/// Must not be used from inside an async runtime thread.
#[derive(Debug)]
pub struct FalClient {
    http: Client,
    config: FalConfig,
}

impl FalClient {
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

impl MediaClient for FalClient {
    fn run(&self, model_id: &str, arguments: &Arguments) -> Result<Value> {
        let url = endpoint_url(&self.config.run_url, model_id);
        let auth = authorization(self.config.api_key.as_ref())?;

        tracing::debug!(model_id, url = %url, "running fal model");

        let response = self
            .http
            .post(&url)
            .header(AUTHORIZATION, auth)
            .json(arguments)
            .send()
            .map_err(|e| {
                tracing::error!(model_id, error = %e, "fal run request failed");
                MediaError::Http(e)
            })?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            tracing::warn!(model_id, status = %status, "fal run returned error");
            return Err(api_error(status.as_u16(), &body));
        }

        let result: Value = response
            .json()
            .map_err(|e| MediaError::Parse(format!("invalid fal run response: {e}")))?;

        tracing::debug!(model_id, "fal run complete");

        Ok(result)
    }
}
