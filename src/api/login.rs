use axum::{
    Extension,
    http::header::SET_COOKIE,
    response::{IntoResponse, Redirect},
};

use crate::{server::AppState, utils};

pub async fn login(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let auth_state = utils::generate_state();
    let url = state.spotify.authorize_url(&auth_state);

    tracing::debug!("redirecting to Spotify authorization");
    (
        [(SET_COOKIE, utils::state_cookie(&auth_state))],
        Redirect::to(url.as_str()),
    )
}
