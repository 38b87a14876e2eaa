//! Error types for the session layer.

use doodlesync_transport::TransportError;

/// Errors from the request/response game API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused,
    /// timeout, TLS failure...).
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("{message} (HTTP {status})")]
    Status { status: u16, message: String },

    /// The server answered with a body we could not parse.
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The configured base URL is not an `http(s)://` URL.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

/// Errors that can occur while running a game session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The session configuration is unusable.
    #[error("invalid configuration: {0}")]
    Config(String),
}
