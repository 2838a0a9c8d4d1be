use std::fmt;

use serde::{Deserialize, Serialize};

use crate::utils;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub scope: String,
    #[serde(default)]
    pub expires_in: u64,
}

/// Token endpoint response for the `refresh_token` grant. Spotify may or may
/// not rotate the refresh token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshedToken {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedTracksPage {
    pub items: Vec<SavedTrack>,
    pub next: Option<String>,
    #[serde(default)]
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedTrack {
    pub track: Option<Track>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    /// `null` for local files.
    pub id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioFeaturesResponse {
    pub audio_features: Vec<Option<AudioFeatures>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioFeatures {
    #[serde(default)]
    pub id: Option<String>,
    pub danceability: f64,
}

/// Label attached to the averaged danceability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Dancer,
    Human,
}

impl Verdict {
    pub fn from_danceability(danceability: f64) -> Self {
        if danceability >= 0.5 {
            Verdict::Dancer
        } else {
            Verdict::Human
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Dancer => write!(f, "Dancer"),
            Verdict::Human => write!(f, "Human"),
        }
    }
}

/// Result of measuring one user's library.
#[derive(Debug, Clone)]
pub struct Measurement {
    pub token: Token,
    /// Mean danceability, `None` when nothing could be measured.
    pub danceability: Option<f64>,
    /// Number of values that went into the mean.
    pub tracks: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefreshParams {
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
}

/// Fragment parameters of a successful callback redirect.
#[derive(Debug, Clone, Serialize)]
pub struct SuccessFragment {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub danceability: Option<String>,
    #[serde(rename = "humanDancer", skip_serializing_if = "Option::is_none")]
    pub human_dancer: Option<String>,
    pub tracks: usize,
}

impl From<Measurement> for SuccessFragment {
    fn from(m: Measurement) -> Self {
        SuccessFragment {
            access_token: m.token.access_token,
            refresh_token: m.token.refresh_token,
            danceability: m.danceability.map(utils::percent),
            human_dancer: m
                .danceability
                .map(|d| Verdict::from_danceability(d).to_string()),
            tracks: m.tracks,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorFragment {
    pub error: &'static str,
}
