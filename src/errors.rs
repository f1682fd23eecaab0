// src/errors.rs
use thiserror::Error;

/// HTTP-level failure while talking to a listing source.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("request timeout")]
    Timeout,

    #[error("http error {status}")]
    Http { status: reqwest::StatusCode },

    #[error("malformed payload: {0}")]
    Payload(String),

    #[error("transport error: {0}")]
    Transport(String),
}

impl FetchError {
    pub fn from_reqwest_error(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if let Some(status) = err.status() {
            Self::Http { status }
        } else if err.is_decode() || err.is_body() {
            Self::Payload(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Precondition failures reported before any request goes out.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunError {
    #[error("select at least one search term")]
    NoSearchTerms,

    #[error("select at least one source")]
    NoSources,
}
