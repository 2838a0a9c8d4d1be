//! Configuration management for the danceability server.
//!
//! This module handles loading configuration values from environment variables
//! and `.env` files and turning them into an explicit [`Config`] value. The
//! value is built once at startup and handed to every component that needs
//! it; nothing reads the environment after that.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the current directory
//! 3. `.env` file in the local data directory
//! 4. Application defaults (where applicable)

use std::{env, fmt, path::PathBuf, time::Duration};

use reqwest::Url;

use crate::error::ConfigError;

pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8888";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_FRONTEND_URI: &str = "/";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MAX_PAGES: usize = 1000;

/// Loads environment variables from `.env` files.
///
/// Creates the necessary directory structure if it doesn't exist and loads
/// environment variables from a `.env` file located in the platform-specific
/// local data directory under `dancecheck/.env`. A `.env` in the working
/// directory is loaded first so it wins over the data directory file.
/// Variables already present in the process environment are never
/// overwritten.
///
/// # Directory Structure
///
/// The function looks for the `.env` file in:
/// - Linux: `~/.local/share/dancecheck/.env`
/// - macOS: `~/Library/Application Support/dancecheck/.env`
/// - Windows: `%LOCALAPPDATA%/dancecheck/.env`
///
/// # Errors
///
/// Returns an error string if the data directory cannot be created or if
/// neither `.env` file could be read. Callers treat this as a warning since
/// the process environment alone may be sufficient.
///
/// # Example
///
/// ```
/// use dancecheck::config;
///
/// #[tokio::main]
/// async fn main() {
///     if let Err(e) = config::load_env().await {
///         eprintln!("Configuration error: {}", e);
///     }
/// }
/// ```
pub async fn load_env() -> Result<(), String> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("dancecheck/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    let local = dotenv::dotenv();
    let data_dir = dotenv::from_path(&path);

    match (local, data_dir) {
        (Err(_), Err(e)) => Err(format!("{} ({})", e, path.display())),
        _ => Ok(()),
    }
}

/// Runtime configuration for the server and the Spotify client.
#[derive(Clone)]
pub struct Config {
    /// Client ID obtained when registering the application with Spotify.
    pub client_id: String,
    /// Client secret paired with `client_id`. Never logged.
    pub client_secret: String,
    /// Callback URL registered in the Spotify application settings.
    pub redirect_uri: String,
    /// Address the HTTP server binds to, e.g. `127.0.0.1:8888`.
    pub server_addr: String,
    /// Spotify's OAuth authorization endpoint.
    pub auth_url: Url,
    /// Spotify's token exchange endpoint.
    pub token_url: Url,
    /// Base URL of the Web API, without a trailing slash.
    pub api_url: String,
    /// Where result and error redirects point; the outcome is appended as a
    /// URL fragment.
    pub frontend_uri: String,
    /// Directory of static front-end files served for unknown routes.
    pub static_dir: Option<PathBuf>,
    /// Upper bound for every outbound request.
    pub request_timeout: Duration,
    /// Upper bound on saved-tracks pages fetched for a single callback.
    pub max_pages: usize,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_uri", &self.redirect_uri)
            .field("server_addr", &self.server_addr)
            .field("auth_url", &self.auth_url.as_str())
            .field("token_url", &self.token_url.as_str())
            .field("api_url", &self.api_url)
            .field("frontend_uri", &self.frontend_uri)
            .field("static_dir", &self.static_dir)
            .field("request_timeout", &self.request_timeout)
            .field("max_pages", &self.max_pages)
            .finish()
    }
}

impl Config {
    /// Builds the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a required variable is missing or a
    /// value cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated the same as missing ones.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let server_addr = match (get("SERVER_ADDRESS"), get("PORT")) {
            (Some(addr), _) => addr,
            (None, Some(port)) => format!("0.0.0.0:{}", parse_number::<u16>("PORT", port)?),
            (None, None) => DEFAULT_SERVER_ADDRESS.to_string(),
        };

        let api_url = get("SPOTIFY_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        parse_url("SPOTIFY_API_URL", &api_url)?;

        let request_timeout = match get("SPOTIFY_REQUEST_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(parse_positive("SPOTIFY_REQUEST_TIMEOUT_SECS", v)?),
            None => Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        };

        let max_pages = match get("SPOTIFY_MAX_PAGES") {
            Some(v) => parse_positive("SPOTIFY_MAX_PAGES", v)?,
            None => DEFAULT_MAX_PAGES,
        };

        Ok(Self {
            client_id: require("SPOTIFY_API_AUTH_CLIENT_ID")?,
            client_secret: require("SPOTIFY_API_AUTH_CLIENT_SECRET")?,
            redirect_uri: require("SPOTIFY_API_REDIRECT_URI")?,
            server_addr,
            auth_url: parse_url(
                "SPOTIFY_API_AUTH_URL",
                &get("SPOTIFY_API_AUTH_URL").unwrap_or_else(|| DEFAULT_AUTH_URL.to_string()),
            )?,
            token_url: parse_url(
                "SPOTIFY_API_TOKEN_URL",
                &get("SPOTIFY_API_TOKEN_URL").unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
            )?,
            api_url: api_url.trim_end_matches('/').to_string(),
            frontend_uri: get("FRONTEND_URI").unwrap_or_else(|| DEFAULT_FRONTEND_URI.to_string()),
            static_dir: get("STATIC_DIR").map(PathBuf::from),
            request_timeout,
            max_pages,
        })
    }
}

fn parse_url(key: &'static str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|e| ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

fn parse_number<T>(key: &'static str, value: String) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
        key,
        value: value.clone(),
        reason: e.to_string(),
    })
}

fn parse_positive<T>(key: &'static str, value: String) -> Result<T, ConfigError>
where
    T: std::str::FromStr + Default + PartialEq,
    T::Err: std::fmt::Display,
{
    let parsed = parse_number::<T>(key, value.clone())?;
    if parsed == T::default() {
        return Err(ConfigError::Invalid {
            key,
            value,
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(parsed)
}
