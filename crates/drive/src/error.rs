//! Error types for Drive API calls

/// Errors from Drive service construction and API requests.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid Drive configuration: {0}")]
    Config(String),

    #[error("authorization failed: {0}")]
    Auth(#[from] drive_auth::Error),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Drive API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("invalid Drive response: {0}")]
    Decode(String),
}

/// Result alias for Drive operations.
pub type Result<T> = std::result::Result<T, Error>;
