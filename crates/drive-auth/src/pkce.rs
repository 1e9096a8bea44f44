//! PKCE (Proof Key for Code Exchange) implementation per RFC 7636
//!
//! Generates the code verifier, S256 challenge and CSRF state for the
//! authorization URL. Google accepts PKCE alongside the client secret for
//! installed applications.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngExt;
use reqwest::Url;
use sha2::{Digest, Sha256};

use crate::client_secret::ClientSecret;
use crate::error::{Error, Result};

/// Generate a cryptographically random PKCE code verifier.
///
/// 96 random bytes encoded as URL-safe base64 (no padding): exactly 128
/// characters, the RFC 7636 maximum that Google accepts.
pub fn generate_verifier() -> String {
    let mut bytes = [0u8; 96];
    rand::rng().fill(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Random opaque `state` value echoed back by the authorization server.
pub fn generate_state() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Compute the S256 code challenge from a verifier.
///
/// `challenge = BASE64URL(SHA256(verifier))`
pub fn compute_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Build the consent page URL the user opens in a browser.
///
/// `access_type=offline` asks for a refresh token so later starts do not
/// need the browser again.
pub fn build_authorization_url(
    secret: &ClientSecret,
    scope: &str,
    state: &str,
    challenge: &str,
) -> Result<String> {
    let url = Url::parse_with_params(
        &secret.auth_uri,
        &[
            ("client_id", secret.client_id.as_str()),
            ("redirect_uri", secret.redirect_uri.as_str()),
            ("response_type", "code"),
            ("scope", scope),
            ("access_type", "offline"),
            ("code_challenge", challenge),
            ("code_challenge_method", "S256"),
            ("state", state),
        ],
    )
    .map_err(|e| Error::CredentialParse(format!("invalid auth_uri {}: {e}", secret.auth_uri)))?;
    Ok(url.into())
}
