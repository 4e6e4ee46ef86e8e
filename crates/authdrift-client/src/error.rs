//! Client error type.

use thiserror::Error;

/// Errors surfaced by [`crate::DriveClient`].
///
/// Deliberately narrow: an HTTP status of any value is a successful
/// exchange from the client's point of view and comes back as data. Only
/// failures to complete the exchange at all land here.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid share link url: {0}")]
    InvalidShareUrl(String),
}

impl ClientError {
    /// Whether retrying the call could plausibly succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            Self::InvalidShareUrl(_) => false,
        }
    }
}
