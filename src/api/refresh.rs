use axum::{
    Extension, Json,
    extract::Query,
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    server::AppState,
    types::{ErrorFragment, RefreshParams, RefreshResponse},
    utils,
};

pub async fn refresh_token(
    Query(params): Query<RefreshParams>,
    Extension(state): Extension<AppState>,
) -> Response {
    let invalid = || {
        let url = utils::fragment_url(
            &state.config.frontend_uri,
            &ErrorFragment {
                error: "invalid_token",
            },
        );
        Redirect::to(&url).into_response()
    };

    let Some(refresh_token) = params.refresh_token.filter(|t| !t.is_empty()) else {
        tracing::warn!("refresh requested without a refresh token");
        return invalid();
    };

    match state.spotify.refresh_access_token(&refresh_token).await {
        Ok(token) => Json(RefreshResponse {
            access_token: token.access_token,
        })
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "token refresh failed");
            invalid()
        }
    }
}
