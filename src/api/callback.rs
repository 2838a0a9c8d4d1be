use axum::{
    Extension,
    extract::Query,
    http::{HeaderMap, header::SET_COOKIE},
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    error::CallbackError,
    server::AppState,
    spotify::SpotifyClient,
    types::{CallbackParams, ErrorFragment, Measurement, SuccessFragment},
    utils,
};

/// Completes the authorization started by `/login`.
///
/// The state echoed back by Spotify must match the one stored in the
/// browser's cookie; on mismatch nothing is exchanged and the browser is
/// sent to `#error=state_mismatch`. Otherwise the state cookie is cleared,
/// the code is exchanged for tokens and the user's saved tracks are
/// measured. Any failure along the way ends in `#error=invalid_token`.
pub async fn callback(
    Query(params): Query<CallbackParams>,
    headers: HeaderMap,
    Extension(state): Extension<AppState>,
) -> Response {
    let frontend = state.config.frontend_uri.as_str();
    let stored_state = utils::cookie_value(&headers, utils::STATE_COOKIE);

    if !utils::state_matches(params.state.as_deref(), stored_state.as_deref()) {
        let err = CallbackError::StateMismatch;
        tracing::warn!(error = %err, "rejecting callback");
        return redirect_error(frontend, &err).into_response();
    }

    let cleared = [(SET_COOKIE, utils::expired_state_cookie())];

    match measure(&state.spotify, params).await {
        Ok(measurement) => {
            tracing::info!(
                tracks = measurement.tracks,
                danceability = ?measurement.danceability,
                "measured saved tracks"
            );
            let url = utils::fragment_url(frontend, &SuccessFragment::from(measurement));
            (cleared, Redirect::to(&url)).into_response()
        }
        Err(err) => {
            tracing::error!(error = %err, "authorization callback failed");
            (cleared, redirect_error(frontend, &err)).into_response()
        }
    }
}

/// Exchanges the code, lists saved tracks and averages their danceability.
async fn measure(
    spotify: &SpotifyClient,
    params: CallbackParams,
) -> Result<Measurement, CallbackError> {
    if let Some(reason) = params.error {
        return Err(CallbackError::AccessDenied(reason));
    }
    let code = params
        .code
        .filter(|c| !c.is_empty())
        .ok_or(CallbackError::MissingCode)?;

    let token = spotify.exchange_code(&code).await?;
    let ids = spotify.saved_track_ids(&token.access_token).await?;
    let (danceability, tracks) = spotify.average_danceability(&ids, &token.access_token).await?;

    Ok(Measurement {
        token,
        danceability,
        tracks,
    })
}

fn redirect_error(frontend: &str, err: &CallbackError) -> Redirect {
    let fragment = ErrorFragment {
        error: err.fragment_code(),
    };
    Redirect::to(&utils::fragment_url(frontend, &fragment))
}
