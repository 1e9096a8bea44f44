//! Drive v3 service handle built on an authenticated client

use std::sync::Arc;

use drive_auth::AuthenticatedClient;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

/// Public Drive v3 REST endpoint
pub const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";

const ABOUT_FIELDS: &str = "user(displayName,emailAddress),storageQuota(limit,usage)";

/// Signed-in account and quota, as reported by `about.get`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct About {
    pub user: User,
    #[serde(default)]
    pub storage_quota: Option<StorageQuota>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub email_address: String,
}

/// Drive encodes int64 fields as JSON strings; `limit` is absent for
/// unlimited accounts.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageQuota {
    #[serde(default)]
    pub limit: Option<String>,
    #[serde(default)]
    pub usage: Option<String>,
}

/// Handle to the user's Drive.
#[derive(Clone)]
pub struct DriveService {
    client: Arc<AuthenticatedClient>,
    base_url: String,
    safemode: bool,
}

impl DriveService {
    pub fn new(client: AuthenticatedClient) -> Self {
        Self {
            client: Arc::new(client),
            base_url: DRIVE_API_BASE.into(),
            safemode: false,
        }
    }

    /// Point the handle at a different API root (test servers, proxies).
    pub fn with_base_url(client: AuthenticatedClient, base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(Error::Config(format!(
                "base URL must start with http:// or https://, got: {base_url}"
            )));
        }
        Ok(Self {
            client: Arc::new(client),
            base_url: base_url.trim_end_matches('/').to_owned(),
            safemode: false,
        })
    }

    /// Mark the handle read-only for the filesystem layer.
    pub fn safemode(mut self, enabled: bool) -> Self {
        self.safemode = enabled;
        self
    }

    pub fn is_safemode(&self) -> bool {
        self.safemode
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn client(&self) -> &AuthenticatedClient {
        &self.client
    }

    /// Fetch the signed-in user and storage quota.
    pub async fn about(&self) -> Result<About> {
        let url = reqwest::Url::parse_with_params(
            &format!("{}/about", self.base_url),
            &[("fields", ABOUT_FIELDS)],
        )
        .map_err(|e| Error::Config(format!("invalid base URL {}: {e}", self.base_url)))?;
        let response = self
            .client
            .get(url.as_str())
            .await?
            .send()
            .await
            .map_err(|e| Error::Http(format!("about request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<no body>"));
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        let about = response
            .json::<About>()
            .await
            .map_err(|e| Error::Decode(format!("about: {e}")))?;
        debug!(email = %about.user.email_address, "fetched about");
        Ok(about)
    }
}
