//! # API Module
//!
//! HTTP endpoints of the danceability server.
//!
//! ## Endpoints
//!
//! ### Authorization
//!
//! - [`login`] - Issues an anti-forgery state, stores it in a cookie and
//!   redirects the browser to Spotify's consent screen.
//! - [`callback`] - Verifies the returned state, exchanges the code for
//!   tokens, measures the user's saved tracks and redirects back to the
//!   front end with the result in the URL fragment.
//! - [`refresh_token`] - Exchanges a refresh token for a fresh access token.
//!
//! ### Monitoring
//!
//! - [`health`] - Returns application status and version.
//!
//! ## Redirect Contract
//!
//! Outcomes are reported to the browser as fragment parameters on the
//! configured front-end URI, never as error statuses:
//!
//! ```text
//! /#access_token=…&refresh_token=…&danceability=62.00&humanDancer=Dancer&tracks=120
//! /#error=state_mismatch
//! /#error=invalid_token
//! ```
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use axum::{Router, routing::get};
//! use dancecheck::api::{callback, login};
//!
//! let app = Router::new()
//!     .route("/login", get(login))
//!     .route("/callback", get(callback));
//! ```

mod callback;
mod health;
mod login;
mod refresh;

pub use callback::callback;
pub use health::health;
pub use login::login;
pub use refresh::refresh_token;
