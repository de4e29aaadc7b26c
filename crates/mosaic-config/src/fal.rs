use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::env::non_empty_var;

/// Default fal.ai host; the queue lives on the `queue.` subdomain
pub const DEFAULT_FAL_RUN_HOST: &str = "fal.run";

/// Default delay between queue status polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Connection settings for the fal.ai API
#[derive(Debug, Clone)]
pub struct FalConfig {
    /// API key sent as `Authorization: Key <key>`
    pub api_key: Option<SecretString>,
    /// Base URL of the synchronous run endpoint
    pub run_url: Url,
    /// Base URL of the queue endpoint
    pub queue_url: Url,
    /// Delay between queue status polls
    pub poll_interval: Duration,
}

impl FalConfig {
    /// Build a configuration for the given host, without credentials
    ///
    /// # Errors
    ///
    /// Returns an error if the host does not form valid URLs
    pub fn for_host(host: &str) -> anyhow::Result<Self> {
        let run_url = Url::parse(&format!("https://{host}"))
            .map_err(|e| anyhow::anyhow!("invalid fal run host `{host}`: {e}"))?;
        let queue_url = Url::parse(&format!("https://queue.{host}"))
            .map_err(|e| anyhow::anyhow!("invalid fal queue host `queue.{host}`: {e}"))?;

        Ok(Self {
            api_key: None,
            run_url,
            queue_url,
            poll_interval: DEFAULT_POLL_INTERVAL,
        })
    }

    /// Discover settings from the process environment
    ///
    /// The key comes from `FAL_KEY`, or from `FAL_KEY_ID` and `FAL_KEY_SECRET`
    /// joined as `id:secret`. `FAL_RUN_HOST` replaces the default host.
    /// Missing credentials are not an error here; requests fail instead.
    ///
    /// # Errors
    ///
    /// Returns an error if `FAL_RUN_HOST` does not form valid URLs
    pub fn from_env() -> anyhow::Result<Self> {
        let host = non_empty_var("FAL_RUN_HOST").unwrap_or_else(|| DEFAULT_FAL_RUN_HOST.to_owned());
        let mut config = Self::for_host(&host)?;

        config.api_key = match (non_empty_var("FAL_KEY"), non_empty_var("FAL_KEY_ID"), non_empty_var("FAL_KEY_SECRET")) {
            (Some(key), _, _) => Some(SecretString::from(key)),
            (None, Some(id), Some(secret)) => Some(SecretString::from(format!("{id}:{secret}"))),
            _ => None,
        };

        Ok(config)
    }

    /// Point both endpoints at a single base URL
    ///
    /// Useful for proxies and local test servers that serve the run and queue
    /// APIs from one origin.
    #[must_use]
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.run_url = base_url.clone();
        self.queue_url = base_url;
        self
    }

    /// Set the API key
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::from(api_key.into()));
        self
    }

    /// Set the queue poll interval
    #[must_use]
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}
