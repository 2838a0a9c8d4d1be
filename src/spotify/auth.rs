use reqwest::{Url, header::AUTHORIZATION};

use crate::{
    error::SpotifyError,
    spotify::{SpotifyClient, check_status},
    types::{RefreshedToken, Token},
    utils,
};

/// Permissions requested from the user: profile, email and library read.
pub const SCOPE: &str = "user-read-private user-read-email user-library-read";

impl SpotifyClient {
    /// Builds the URL the browser is sent to for user consent.
    ///
    /// The `state` value is echoed back by Spotify on the callback and must
    /// match what was stored for this browser.
    ///
    /// # Example
    ///
    /// ```
    /// let url = client.authorize_url("Xq3v9LkP0aB7cD2e");
    /// // https://accounts.spotify.com/authorize?response_type=code&client_id=…&scope=…&redirect_uri=…&state=Xq3v9LkP0aB7cD2e
    /// ```
    pub fn authorize_url(&self, state: &str) -> Url {
        let mut url = self.config.auth_url.clone();
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.config.client_id)
            .append_pair("scope", SCOPE)
            .append_pair("redirect_uri", &self.config.redirect_uri)
            .append_pair("state", state);
        url
    }

    /// Exchanges an authorization code for access and refresh tokens.
    ///
    /// Authenticates with the client id and secret via HTTP Basic auth. The
    /// code is single-use; a second exchange or an expired code is answered
    /// with `400 invalid_grant`, which surfaces as [`SpotifyError::Status`].
    ///
    /// # Errors
    ///
    /// - [`SpotifyError::Http`] on network failure, timeout or a body
    ///   without `access_token`/`refresh_token`
    /// - [`SpotifyError::Unauthorized`] for rejected client credentials
    /// - [`SpotifyError::Status`] for any other non-success status
    pub async fn exchange_code(&self, code: &str) -> Result<Token, SpotifyError> {
        let response = self
            .http
            .post(self.config.token_url.clone())
            .header(
                AUTHORIZATION,
                utils::basic_auth_header(&self.config.client_id, &self.config.client_secret),
            )
            .form(&[
                ("code", code),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await?;

        let token = check_status(response)?.json::<Token>().await?;
        tracing::debug!(
            scope = %token.scope,
            expires_in = token.expires_in,
            "authorization code exchanged"
        );
        Ok(token)
    }

    /// Exchanges a refresh token for a new access token. Does not touch the
    /// user's library.
    pub async fn refresh_access_token(
        &self,
        refresh_token: &str,
    ) -> Result<RefreshedToken, SpotifyError> {
        let response = self
            .http
            .post(self.config.token_url.clone())
            .header(
                AUTHORIZATION,
                utils::basic_auth_header(&self.config.client_id, &self.config.client_secret),
            )
            .form(&[("grant_type", "refresh_token"), ("refresh_token", refresh_token)])
            .send()
            .await?;

        Ok(check_status(response)?.json::<RefreshedToken>().await?)
    }
}
