use thiserror::Error;

/// Proxy transport failure.
///
/// Carries no meaning about the client's identity: every variant is treated
/// as "backend decision unavailable" (fail-closed).
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("proxy transport error: {0}")]
    Transport(String),

    #[error("unexpected proxy status: {0}")]
    Status(u16),

    #[error("malformed proxy reply: {0}")]
    Decode(String),

    #[error("proxy request timed out")]
    Timeout,

    #[error("proxy request cancelled")]
    Cancelled,
}

impl From<reqwest::Error> for ProxyError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ProxyError::Timeout
        } else if e.is_decode() {
            ProxyError::Decode(e.to_string())
        } else {
            ProxyError::Transport(e.to_string())
        }
    }
}

/// Connection metadata could not be resolved into raw bytes.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("invalid base64 info: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
}
