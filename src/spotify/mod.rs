//! # Spotify Integration Module
//!
//! This module is the only place that talks to Spotify. It wraps a single
//! `reqwest` client together with the [`Config`] it was built from, so every
//! request carries the configured timeout and endpoint URLs.
//!
//! ## Submodules
//!
//! - [`auth`] - authorization URL, code exchange and token refresh against
//!   the accounts service (client-secret flow, Basic auth)
//! - [`tracks`] - pages through the user's saved tracks and collects ids
//! - [`features`] - batch-fetches audio features and averages danceability
//!
//! ## Request Flow
//!
//! ```text
//! /callback
//!    ├── auth::exchange_code         POST /api/token
//!    ├── tracks::saved_track_ids     GET  /me/tracks (until next == null)
//!    └── features::danceability      GET  /audio-features?ids=… (100 per batch)
//! ```
//!
//! ## Error Handling
//!
//! Every call is made once. Non-success statuses are classified by
//! [`check_status`] into [`SpotifyError`] variants; the first failure aborts the
//! whole operation and nothing accumulated so far is returned.

use std::sync::Arc;

use reqwest::{Client, Response, StatusCode, header::RETRY_AFTER};
use serde::de::DeserializeOwned;

use crate::{config::Config, error::SpotifyError};

pub mod auth;
pub mod features;
pub mod tracks;

#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: Client,
    config: Arc<Config>,
}

impl SpotifyClient {
    /// Builds the HTTP client with the configured request timeout.
    pub fn new(config: Arc<Config>) -> Result<Self, SpotifyError> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// GET `url` with bearer authentication and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        token: &str,
    ) -> Result<T, SpotifyError> {
        let response = self.http.get(url).bearer_auth(token).send().await?;
        let response = check_status(response)?;
        Ok(response.json::<T>().await?)
    }
}

/// Maps a non-success response to the matching [`SpotifyError`].
pub(crate) fn check_status(response: Response) -> Result<Response, SpotifyError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Err(SpotifyError::Unauthorized { status })
        }
        StatusCode::TOO_MANY_REQUESTS => {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok());
            Err(SpotifyError::RateLimited { retry_after })
        }
        _ => Err(SpotifyError::Status {
            status,
            url: response.url().to_string(),
        }),
    }
}
