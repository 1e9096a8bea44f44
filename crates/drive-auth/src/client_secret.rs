//! OAuth client secret descriptor
//!
//! Google issues `client_secret.json` with the credentials nested under an
//! `installed` (desktop app) or `web` key. Only the fields the authorization
//! code flow needs are kept; endpoints fall back to Google's defaults.

use std::path::Path;

use common::Secret;
use serde::Deserialize;
use tracing::debug;

use crate::constants::{DEFAULT_AUTH_URI, DEFAULT_TOKEN_URI, OOB_REDIRECT_URI};
use crate::error::{Error, Result};

/// Identifies this application to the authorization server.
#[derive(Debug, Clone)]
pub struct ClientSecret {
    pub client_id: String,
    pub client_secret: Secret<String>,
    pub auth_uri: String,
    pub token_uri: String,
    pub redirect_uri: String,
}

#[derive(Deserialize)]
struct SecretFile {
    installed: Option<SecretEntry>,
    web: Option<SecretEntry>,
}

#[derive(Deserialize)]
struct SecretEntry {
    client_id: String,
    client_secret: Secret<String>,
    auth_uri: Option<String>,
    token_uri: Option<String>,
    #[serde(default)]
    redirect_uris: Vec<String>,
}

impl ClientSecret {
    /// Build a descriptor from inline values with default Google endpoints.
    pub fn from_parts(client_id: impl Into<String>, client_secret: Secret<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret,
            auth_uri: DEFAULT_AUTH_URI.into(),
            token_uri: DEFAULT_TOKEN_URI.into(),
            redirect_uri: OOB_REDIRECT_URI.into(),
        }
    }

    /// Parse the vendor JSON format. `installed` wins when both keys exist.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let file: SecretFile = serde_json::from_slice(bytes)
            .map_err(|e| Error::CredentialParse(format!("parsing client secret: {e}")))?;

        let entry = file.installed.or(file.web).ok_or_else(|| {
            Error::CredentialParse("client secret has neither `installed` nor `web` section".into())
        })?;

        if entry.client_id.trim().is_empty() {
            return Err(Error::CredentialParse("client secret has empty client_id".into()));
        }

        Ok(Self {
            client_id: entry.client_id,
            client_secret: entry.client_secret,
            auth_uri: entry.auth_uri.unwrap_or_else(|| DEFAULT_AUTH_URI.into()),
            token_uri: entry.token_uri.unwrap_or_else(|| DEFAULT_TOKEN_URI.into()),
            redirect_uri: entry
                .redirect_uris
                .into_iter()
                .next()
                .unwrap_or_else(|| OOB_REDIRECT_URI.into()),
        })
    }

    /// Read and parse a client secret file.
    pub async fn load(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| Error::Io(format!("reading client secret {}: {e}", path.display())))?;
        let secret = Self::from_json(&bytes)?;
        debug!(path = %path.display(), client_id = %secret.client_id, "loaded client secret");
        Ok(secret)
    }
}
