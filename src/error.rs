use thiserror::Error;

/// Top-level application error.
///
/// Service failures never reach this type: the submission flow logs them and
/// leaves the session in a terminal phase instead. What remains is the
/// plumbing around the UI itself.
#[derive(Debug, Error)]
pub enum BylineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("clipboard error: {0}")]
    Clipboard(String),
}
