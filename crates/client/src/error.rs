/// Errors from talking to the catalog API.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server answered with a non-2xx status.
    #[error("Server error ({status}): {}", message.as_deref().unwrap_or("no message"))]
    Server {
        status: u16,
        /// The `message` field of the response body, when there was one.
        message: Option<String>,
    },

    /// The request never produced a usable response (connect, timeout,
    /// unreadable body).
    #[error("Network error: {0}")]
    Network(String),

    /// The request body could not be built.
    #[error("Failed to encode request: {0}")]
    Encode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Network(err.to_string())
    }
}
