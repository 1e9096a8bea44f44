//! Error types for Drive authorization

/// Errors from client secret loading, token exchange and the token cache.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("token exchange failed: {0}")]
    TokenExchange(String),

    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("credential parse error: {0}")]
    CredentialParse(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("authorization prompt failed: {0}")]
    Prompt(String),
}

/// Result alias for auth operations.
pub type Result<T> = std::result::Result<T, Error>;
