//! # CLI Module
//!
//! Command implementations behind the `dancecheck` binary. Argument parsing
//! lives in `main.rs`; the functions here load configuration, report progress
//! on the console and hand off to the server.
//!
//! ## Commands
//!
//! - [`serve`] - Runs the authorization server, optionally opening the login
//!   page in the default browser
//!
//! ## Usage Patterns
//!
//! ```bash
//! dancecheck serve                          # listen on SERVER_ADDRESS
//! dancecheck serve --addr 0.0.0.0:8888      # override the bind address
//! dancecheck serve --open                   # open /login in the browser
//! dancecheck completions zsh > _dancecheck  # shell completions
//! ```
//!
//! ## Error Handling
//!
//! Configuration problems are fatal and reported with [`crate::error!`],
//! which exits the process. Failing to open a browser is only a warning.

mod serve;

pub use serve::serve;
