use axum::http::{HeaderMap, header::COOKIE};
use base64::{Engine, engine::general_purpose::STANDARD};
use rand::{Rng, distr::Alphanumeric};
use serde::Serialize;

pub const STATE_COOKIE: &str = "spotify_auth_state";
pub const STATE_LENGTH: usize = 16;

pub fn generate_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(STATE_LENGTH)
        .map(char::from)
        .collect()
}

pub fn basic_auth_header(client_id: &str, client_secret: &str) -> String {
    format!(
        "Basic {}",
        STANDARD.encode(format!("{}:{}", client_id, client_secret))
    )
}

/// Finds a cookie by name across all `Cookie` headers of a request.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim().to_string())
}

pub fn state_cookie(value: &str) -> String {
    format!("{}={}; Path=/; HttpOnly; SameSite=Lax", STATE_COOKIE, value)
}

pub fn expired_state_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", STATE_COOKIE)
}

/// A callback is only trusted when Spotify echoes back exactly the state we
/// stored. A missing state never matches.
pub fn state_matches(received: Option<&str>, stored: Option<&str>) -> bool {
    match (received, stored) {
        (Some(received), Some(stored)) => !received.is_empty() && received == stored,
        _ => false,
    }
}

/// Appends `params` to `base` as an url-encoded fragment.
pub fn fragment_url<T: Serialize>(base: &str, params: &T) -> String {
    let base = base.split('#').next().unwrap_or_default();
    match serde_urlencoded::to_string(params) {
        Ok(fragment) => format!("{}#{}", base, fragment),
        Err(e) => {
            tracing::error!(error = %e, "failed to encode redirect fragment");
            format!("{}#error=internal_error", base)
        }
    }
}

/// Formats a 0..1 ratio as a percentage with two decimals. Ties round away
/// from zero, so `0.62125` becomes `62.13`.
pub fn percent(ratio: f64) -> String {
    format!("{:.2}", (ratio * 10000.0).round() / 100.0)
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}
