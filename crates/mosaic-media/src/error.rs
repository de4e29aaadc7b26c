/// Media generation result type
pub type Result<T> = std::result::Result<T, MediaError>;

/// Errors from the media generation clients
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// fal.ai returned an error response
    #[error("fal API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error detail reported by the service
        message: String,
    },

    /// No API key could be discovered
    #[error("missing fal credentials: set FAL_KEY, or FAL_KEY_ID and FAL_KEY_SECRET")]
    MissingCredentials,

    /// Failed to parse a response body
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// Invalid client configuration
    #[error("invalid configuration: {0}")]
    Config(String),
}
