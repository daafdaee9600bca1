use thiserror::Error;

/// Errors produced by the article service client.
///
/// Every failure here is terminal for the current article: the caller logs it
/// and moves the session on, never retries.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The service answered with a non-success HTTP status.
    #[error("service returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// Transport failure (DNS, connection refused, timeout, broken stream).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The status subscription ended or broke before a terminal event arrived.
    #[error("status stream failed: {0}")]
    Stream(String),
}
