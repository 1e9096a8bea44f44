//! Authenticated HTTP client
//!
//! Wraps a `reqwest::Client` together with the current token. Requests built
//! through `get` carry a bearer token that is refreshed first when it has
//! expired; every refresh overwrites the token cache. A failed cache write
//! is logged and does not fail the request.

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::cache::TokenCache;
use crate::client_secret::ClientSecret;
use crate::error::{Error, Result};
use crate::flow;
use crate::prompt::CodePrompt;
use crate::token::{self, Token};

pub struct AuthenticatedClient {
    http: reqwest::Client,
    secret: ClientSecret,
    cache: TokenCache,
    token: Mutex<Token>,
}

impl AuthenticatedClient {
    /// Obtain a token (cache first, interactive otherwise) and wrap it.
    pub async fn connect(
        http: reqwest::Client,
        secret: ClientSecret,
        cache: TokenCache,
        scope: &str,
        prompt: &dyn CodePrompt,
    ) -> Result<Self> {
        let token = flow::obtain_token(&http, &secret, scope, &cache, prompt).await?;
        Ok(Self::new(http, secret, cache, token))
    }

    pub fn new(http: reqwest::Client, secret: ClientSecret, cache: TokenCache, token: Token) -> Self {
        Self {
            http,
            secret,
            cache,
            token: Mutex::new(token),
        }
    }

    /// The current access token, refreshed first if it has expired.
    ///
    /// The lock is held across the refresh so concurrent callers wait for a
    /// single refresh instead of each starting their own.
    pub async fn access_token(&self) -> Result<String> {
        let mut current = self.token.lock().await;
        let now = token::now_millis();
        if !current.is_expired(now) {
            return Ok(current.access_token.clone());
        }

        let refresh = current.refresh_token.clone().ok_or_else(|| {
            Error::InvalidCredentials("access token expired and no refresh token is cached".into())
        })?;

        debug!("access token expired, refreshing");
        let response = token::refresh_token(&self.http, &self.secret, &refresh).await?;
        *current = Token::from_response(response, now, Some(refresh));

        // The refreshed token stays usable in memory even if the disk write fails
        match self.cache.save(&current).await {
            Ok(()) => info!(path = %self.cache.path().display(), "access token refreshed"),
            Err(e) => warn!(
                path = %self.cache.path().display(),
                error = %e,
                "access token refreshed but not persisted"
            ),
        }
        Ok(current.access_token.clone())
    }

    /// Start a GET request carrying a valid bearer token.
    pub async fn get(&self, url: &str) -> Result<reqwest::RequestBuilder> {
        let access = self.access_token().await?;
        Ok(self.http.get(url).bearer_auth(access))
    }

    /// Snapshot of the current token.
    pub async fn token(&self) -> Token {
        self.token.lock().await.clone()
    }

    pub fn cache(&self) -> &TokenCache {
        &self.cache
    }
}
