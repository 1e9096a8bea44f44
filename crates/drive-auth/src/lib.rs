//! Google Drive OAuth authorization library
//!
//! Loads the OAuth client secret, runs the authorization-code flow on the
//! console, caches the resulting token on disk and hands out an HTTP client
//! that keeps the token fresh. It has no dependency on the `drivefs` binary.
//!
//! Startup flow:
//! 1. `ClientSecret::load()` reads `client_secret.json`
//! 2. `TokenCache::in_dir()` derives `<home>/auth.json`
//! 3. `flow::obtain_token()` returns the cached token, or prompts via
//!    `CodePrompt` and persists the exchanged token
//! 4. `AuthenticatedClient` attaches the bearer token, refreshing and
//!    re-saving it on expiry

pub mod cache;
pub mod client;
pub mod client_secret;
pub mod constants;
pub mod error;
pub mod flow;
pub mod pkce;
pub mod prompt;
pub mod token;

pub use cache::TokenCache;
pub use client::AuthenticatedClient;
pub use client_secret::ClientSecret;
pub use constants::*;
pub use error::{Error, Result};
pub use flow::{authorize, obtain_token};
pub use prompt::{CodePrompt, ConsolePrompt};
pub use token::{Token, TokenResponse, exchange_code, refresh_token};
