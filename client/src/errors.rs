use thiserror::Error;

/// Result type alias for transport client operations
pub type Result<T, E = ClientError> = std::result::Result<T, E>;

/// Errors surfaced by the transport client
#[derive(Error, Debug)]
pub enum ClientError {
    /// The backend (or something between us and it) answered with a body
    /// that is not JSON. Carries the HTTP status and a truncated snippet of
    /// the raw body so error pages stay diagnosable.
    #[error("non-JSON response (HTTP {status}): {snippet}")]
    NonJsonResponse { status: u16, snippet: String },

    /// Well-formed envelope with `ok: false`, or a non-2xx status with a
    /// structured error. The message is surfaced to the operator verbatim.
    #[error("{0}")]
    Application(String),

    /// Network-level failure before any body could be read.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response shape: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
}
