//! Error types shared by the Spotify client, the HTTP handlers and the
//! configuration loader.

use reqwest::StatusCode;
use thiserror::Error;

/// Failures talking to the Spotify accounts service or Web API.
#[derive(Debug, Error)]
pub enum SpotifyError {
    /// Network failure, timeout or an undecodable response body.
    #[error("Request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Any other non-success status.
    #[error("Spotify responded with {status} for {url}")]
    Status { status: StatusCode, url: String },

    /// Invalid code, expired token or revoked access.
    #[error("Spotify rejected the credentials ({status})")]
    Unauthorized { status: StatusCode },

    #[error("Rate limited by Spotify (retry after {retry_after:?}s)")]
    RateLimited { retry_after: Option<u64> },

    /// The saved-tracks cursor did not terminate within the configured bound.
    #[error("Saved tracks did not end within {max_pages} pages")]
    PageLimit { max_pages: usize },
}

/// Reasons an authorization callback cannot be completed.
#[derive(Debug, Error)]
pub enum CallbackError {
    #[error("State returned by Spotify does not match the stored state")]
    StateMismatch,

    #[error("Authorization was denied: {0}")]
    AccessDenied(String),

    #[error("Callback is missing the authorization code")]
    MissingCode,

    #[error(transparent)]
    Upstream(#[from] SpotifyError),
}

impl CallbackError {
    /// Value of the `error` fragment parameter reported to the browser.
    pub fn fragment_code(&self) -> &'static str {
        match self {
            Self::StateMismatch => "state_mismatch",
            Self::AccessDenied(_) | Self::MissingCode | Self::Upstream(_) => "invalid_token",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has invalid value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}
