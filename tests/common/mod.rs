#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use axum::{
    Form, Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use dancecheck::{
    config::Config,
    server::{AppState, router},
    spotify::SpotifyClient,
    utils,
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

pub const CLIENT_ID: &str = "client";
pub const CLIENT_SECRET: &str = "secret";
pub const REDIRECT_URI: &str = "http://127.0.0.1:8888/callback";
pub const GOOD_CODE: &str = "good-code";
pub const ACCESS_TOKEN: &str = "access-123";
pub const REFRESH_TOKEN: &str = "refresh-456";
pub const REFRESHED_ACCESS_TOKEN: &str = "access-789";

type DanceabilityFn = Box<dyn Fn(&str) -> Option<f64> + Send + Sync>;

/// In-process stand-in for the Spotify accounts service and Web API.
pub struct FakeSpotify {
    pub base: String,
    /// Saved tracks in library order; `None` is a local file without id.
    pub library: Vec<Option<String>>,
    /// Keep handing out `next` links forever.
    pub endless: bool,
    pub token_status: StatusCode,
    pub library_status: StatusCode,
    pub features_status: StatusCode,
    /// First library request (1-based) answered with `library_status`.
    pub library_fail_from: usize,
    /// First audio-features request (1-based) answered with `features_status`.
    pub features_fail_from: usize,
    pub danceability: DanceabilityFn,

    pub token_requests: AtomicUsize,
    pub library_requests: AtomicUsize,
    pub feature_requests: AtomicUsize,
    pub batch_sizes: Mutex<Vec<usize>>,
}

pub struct FakeOptions {
    pub library: Vec<Option<String>>,
    pub endless: bool,
    pub token_status: StatusCode,
    pub library_status: StatusCode,
    pub features_status: StatusCode,
    pub library_fail_from: usize,
    pub features_fail_from: usize,
    pub danceability: DanceabilityFn,
}

impl Default for FakeOptions {
    fn default() -> Self {
        Self {
            library: Vec::new(),
            endless: false,
            token_status: StatusCode::OK,
            library_status: StatusCode::OK,
            features_status: StatusCode::OK,
            library_fail_from: 1,
            features_fail_from: 1,
            danceability: Box::new(|_: &str| Some(0.5)),
        }
    }
}

impl FakeOptions {
    pub fn with_tracks(count: usize) -> Self {
        Self {
            library: track_ids(count).into_iter().map(Some).collect(),
            ..Default::default()
        }
    }
}

impl FakeSpotify {
    pub fn token_requests(&self) -> usize {
        self.token_requests.load(Ordering::SeqCst)
    }

    pub fn library_requests(&self) -> usize {
        self.library_requests.load(Ordering::SeqCst)
    }

    pub fn feature_requests(&self) -> usize {
        self.feature_requests.load(Ordering::SeqCst)
    }

    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batch_sizes.lock().unwrap().clone()
    }
}

pub fn track_ids(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("track{:04}", i)).collect()
}

pub async fn spawn_fake(options: FakeOptions) -> Arc<FakeSpotify> {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());

    let fake = Arc::new(FakeSpotify {
        base,
        library: options.library,
        endless: options.endless,
        token_status: options.token_status,
        library_status: options.library_status,
        features_status: options.features_status,
        library_fail_from: options.library_fail_from,
        features_fail_from: options.features_fail_from,
        danceability: options.danceability,
        token_requests: AtomicUsize::new(0),
        library_requests: AtomicUsize::new(0),
        feature_requests: AtomicUsize::new(0),
        batch_sizes: Mutex::new(Vec::new()),
    });

    let app = Router::new()
        .route("/api/token", post(token))
        .route("/v1/me/tracks", get(saved_tracks))
        .route("/v1/audio-features", get(audio_features))
        .with_state(Arc::clone(&fake));

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    fake
}

pub fn test_config(fake: &FakeSpotify) -> Config {
    test_config_with(fake, &[])
}

pub fn test_config_with(fake: &FakeSpotify, overrides: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> = HashMap::from([
        ("SPOTIFY_API_AUTH_CLIENT_ID".to_string(), CLIENT_ID.to_string()),
        ("SPOTIFY_API_AUTH_CLIENT_SECRET".to_string(), CLIENT_SECRET.to_string()),
        ("SPOTIFY_API_REDIRECT_URI".to_string(), REDIRECT_URI.to_string()),
        ("SPOTIFY_API_AUTH_URL".to_string(), format!("{}/authorize", fake.base)),
        ("SPOTIFY_API_TOKEN_URL".to_string(), format!("{}/api/token", fake.base)),
        ("SPOTIFY_API_URL".to_string(), format!("{}/v1", fake.base)),
        ("SPOTIFY_REQUEST_TIMEOUT_SECS".to_string(), "5".to_string()),
    ]);
    for (key, value) in overrides {
        vars.insert(key.to_string(), value.to_string());
    }

    Config::from_lookup(|key| vars.get(key).cloned()).unwrap()
}

pub fn test_client(fake: &FakeSpotify) -> SpotifyClient {
    SpotifyClient::new(Arc::new(test_config(fake))).unwrap()
}

/// Serves the application on a random port and returns its base URL.
pub async fn spawn_app(config: Config) -> String {
    let state = AppState::new(config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());

    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });

    base
}

/// Client that reports redirects instead of following them.
pub fn browser() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

fn bearer_ok(headers: &HeaderMap) -> bool {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {}", ACCESS_TOKEN))
}

fn status_error(status: StatusCode) -> Response {
    (status, Json(json!({ "error": { "status": status.as_u16() } }))).into_response()
}

async fn token(
    State(fake): State<Arc<FakeSpotify>>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    fake.token_requests.fetch_add(1, Ordering::SeqCst);

    if fake.token_status != StatusCode::OK {
        return status_error(fake.token_status);
    }

    let expected = utils::basic_auth_header(CLIENT_ID, CLIENT_SECRET);
    if headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) != Some(expected.as_str()) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "invalid_client" })),
        )
            .into_response();
    }

    let field = |key: &str| form.get(key).map(String::as_str);
    let body: Option<Value> = match field("grant_type") {
        Some("authorization_code")
            if field("code") == Some(GOOD_CODE) && field("redirect_uri") == Some(REDIRECT_URI) =>
        {
            Some(json!({
                "access_token": ACCESS_TOKEN,
                "token_type": "Bearer",
                "scope": "user-read-private user-read-email user-library-read",
                "expires_in": 3600,
                "refresh_token": REFRESH_TOKEN
            }))
        }
        Some("refresh_token") if field("refresh_token") == Some(REFRESH_TOKEN) => Some(json!({
            "access_token": REFRESHED_ACCESS_TOKEN,
            "token_type": "Bearer",
            "expires_in": 3600
        })),
        _ => None,
    };

    match body {
        Some(body) => Json(body).into_response(),
        None => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "invalid_grant" })),
        )
            .into_response(),
    }
}

async fn saved_tracks(
    State(fake): State<Arc<FakeSpotify>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let request = fake.library_requests.fetch_add(1, Ordering::SeqCst) + 1;

    if !bearer_ok(&headers) {
        return status_error(StatusCode::UNAUTHORIZED);
    }
    if fake.library_status != StatusCode::OK && request >= fake.library_fail_from {
        return status_error(fake.library_status);
    }

    let limit: usize = query.get("limit").and_then(|v| v.parse().ok()).unwrap_or(20);
    let offset: usize = query.get("offset").and_then(|v| v.parse().ok()).unwrap_or(0);
    let end = (offset + limit).min(fake.library.len());
    let start = offset.min(end);

    let items: Vec<Value> = fake.library[start..end]
        .iter()
        .map(|id| match id {
            Some(id) => json!({ "added_at": "2020-01-01T00:00:00Z", "track": { "id": id } }),
            None => json!({
                "added_at": "2020-01-01T00:00:00Z",
                "track": { "id": null, "is_local": true }
            }),
        })
        .collect();

    let next = if fake.endless || end < fake.library.len() {
        Some(format!(
            "{}/v1/me/tracks?offset={}&limit={}",
            fake.base, end, limit
        ))
    } else {
        None
    };

    Json(json!({
        "href": format!("{}/v1/me/tracks?offset={}&limit={}", fake.base, offset, limit),
        "items": items,
        "limit": limit,
        "next": next,
        "offset": offset,
        "total": fake.library.len()
    }))
    .into_response()
}

async fn audio_features(
    State(fake): State<Arc<FakeSpotify>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let request = fake.feature_requests.fetch_add(1, Ordering::SeqCst) + 1;

    if !bearer_ok(&headers) {
        return status_error(StatusCode::UNAUTHORIZED);
    }
    if fake.features_status != StatusCode::OK && request >= fake.features_fail_from {
        return status_error(fake.features_status);
    }

    let ids: Vec<&str> = query
        .get("ids")
        .map(|ids| ids.split(',').filter(|id| !id.is_empty()).collect())
        .unwrap_or_default();
    fake.batch_sizes.lock().unwrap().push(ids.len());

    if ids.len() > 100 {
        return status_error(StatusCode::BAD_REQUEST);
    }

    let features: Vec<Value> = ids
        .iter()
        .map(|id| match (fake.danceability)(*id) {
            Some(d) => json!({ "id": id, "danceability": d, "energy": 0.7, "tempo": 120.0 }),
            None => Value::Null,
        })
        .collect();

    Json(json!({ "audio_features": features })).into_response()
}
