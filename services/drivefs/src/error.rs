//! Startup error types
//!
//! One variant per startup stage so `main` can report which step failed.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),

    #[error("unable to load client secret: {0}")]
    ClientSecret(#[source] drive_auth::Error),

    #[error("unable to prepare token cache: {0}")]
    TokenCache(#[source] drive_auth::Error),

    #[error("unable to obtain Drive token: {0}")]
    Authorization(#[source] drive_auth::Error),

    #[error("unable to create Drive client: {0}")]
    Drive(#[from] drive::Error),
}

/// Result alias using service Error
pub type Result<T> = std::result::Result<T, Error>;
