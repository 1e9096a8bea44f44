//! Startup sequence: config → client secret → token → Drive handle

use std::time::Duration;

use drive::DriveService;
use drive_auth::{AuthenticatedClient, ClientSecret, CodePrompt, DRIVE_SCOPE, Token, TokenCache};
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{Error, Result};

/// Resolve the client secret: inline config first, then `client_secret.json`.
pub async fn load_client_secret(config: &Config) -> Result<ClientSecret> {
    if let Some(inline) = &config.client_secret {
        info!(client_id = %inline.client_id, "using inline client secret");
        return Ok(ClientSecret::from_parts(
            inline.client_id.clone(),
            inline.client_secret.clone(),
        ));
    }

    let path = config.client_secret_path();
    info!(path = %path.display(), "loading client secret");
    ClientSecret::load(&path).await.map_err(Error::ClientSecret)
}

/// Write the configured `[auth]` token into the cache unless it already
/// holds a readable token.
pub async fn seed_token_cache(cache: &TokenCache, token: &Token) -> Result<()> {
    if let Ok(Some(_)) = cache.load().await {
        debug!(path = %cache.path().display(), "token cache already populated, ignoring configured token");
        return Ok(());
    }
    info!(path = %cache.path().display(), "seeding token cache from configuration");
    cache.save(token).await.map_err(Error::TokenCache)
}

/// Build the authenticated Drive handle.
///
/// With `reauth` the cached token is discarded first, forcing the
/// interactive flow; the configured token is not used to seed it.
pub async fn init_client(config: &Config, prompt: &dyn CodePrompt, reauth: bool) -> Result<DriveService> {
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| Error::HttpClient(e.to_string()))?;

    let secret = load_client_secret(config).await?;

    let cache = TokenCache::in_dir(&config.home_dir)
        .await
        .map_err(Error::TokenCache)?;
    if reauth {
        cache.clear().await.map_err(Error::TokenCache)?;
    } else if let Some(token) = &config.auth {
        seed_token_cache(&cache, token).await?;
    }

    let client = AuthenticatedClient::connect(http, secret, cache, DRIVE_SCOPE, prompt)
        .await
        .map_err(Error::Authorization)?;

    Ok(DriveService::new(client).safemode(config.options.safemode))
}
