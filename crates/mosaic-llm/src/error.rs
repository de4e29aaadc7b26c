use thiserror::Error;

/// Chat result type
pub type Result<T> = std::result::Result<T, LlmError>;

/// Errors that can occur during chat completion
#[derive(Debug, Error)]
pub enum LlmError {
    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream provider returned an error response
    #[error("upstream error ({status}): {message}")]
    Upstream {
        /// HTTP status code
        status: u16,
        /// Error message reported by the provider
        message: String,
    },

    /// No API key could be discovered
    #[error("missing OpenAI credentials: set OPENAI_API_KEY")]
    MissingCredentials,

    /// The completion carried no choices
    #[error("completion returned no choices")]
    NoChoices,

    /// Failed to encode the request or parse the response
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// Invalid client configuration
    #[error("invalid configuration: {0}")]
    Config(String),
}
