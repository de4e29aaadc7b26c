use secrecy::SecretString;
use url::Url;

use crate::env::non_empty_var;

/// Default `OpenAI` API base URL
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Chat model used when the caller does not name one
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o";

/// Connection settings for the `OpenAI` API
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Bearer token
    pub api_key: Option<SecretString>,
    /// API base URL, including the version segment
    pub base_url: Url,
    /// Organization sent as `OpenAI-Organization`
    pub organization: Option<String>,
    /// Project sent as `OpenAI-Project`
    pub project: Option<String>,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            organization: None,
            project: None,
        }
    }
}

impl OpenAiConfig {
    /// Discover settings from `OPENAI_API_KEY`, `OPENAI_BASE_URL`,
    /// `OPENAI_ORG_ID` and `OPENAI_PROJECT_ID`
    ///
    /// # Errors
    ///
    /// Returns an error if `OPENAI_BASE_URL` is not a valid URL
    pub fn from_env() -> anyhow::Result<Self> {
        let base_url = match non_empty_var("OPENAI_BASE_URL") {
            Some(raw) => Url::parse(&raw).map_err(|e| anyhow::anyhow!("invalid OPENAI_BASE_URL `{raw}`: {e}"))?,
            None => default_base_url(),
        };

        Ok(Self {
            api_key: non_empty_var("OPENAI_API_KEY").map(SecretString::from),
            base_url,
            organization: non_empty_var("OPENAI_ORG_ID"),
            project: non_empty_var("OPENAI_PROJECT_ID"),
        })
    }

    /// Set the API key
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::from(api_key.into()));
        self
    }

    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }
}

#[allow(clippy::missing_panics_doc)]
fn default_base_url() -> Url {
    Url::parse(DEFAULT_OPENAI_BASE_URL).expect("valid default URL")
}
