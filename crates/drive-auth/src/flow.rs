//! Authorization-code flow and cache-first token acquisition
//!
//! `obtain_token` is the startup entry point: reuse the cached token when
//! there is one, otherwise run the interactive flow once and persist the
//! result before handing it back.

use tracing::{info, warn};

use crate::cache::TokenCache;
use crate::client_secret::ClientSecret;
use crate::error::Result;
use crate::pkce;
use crate::prompt::CodePrompt;
use crate::token::{self, Token};

/// Run the interactive authorization-code flow.
///
/// Asks `prompt` exactly once for a code, then exchanges it for tokens.
pub async fn authorize(
    http: &reqwest::Client,
    secret: &ClientSecret,
    scope: &str,
    prompt: &dyn CodePrompt,
) -> Result<Token> {
    let verifier = pkce::generate_verifier();
    let challenge = pkce::compute_challenge(&verifier);
    let state = pkce::generate_state();
    let url = pkce::build_authorization_url(secret, scope, &state, &challenge)?;

    let code = prompt.prompt(&url).await?;
    let response = token::exchange_code(http, secret, &code, &verifier).await?;
    info!(client_id = %secret.client_id, "authorization code exchanged");

    Ok(Token::from_response(response, token::now_millis(), None))
}

/// Load the cached token, or authorize interactively and cache the result.
///
/// An unreadable cache is treated like a missing one.
pub async fn obtain_token(
    http: &reqwest::Client,
    secret: &ClientSecret,
    scope: &str,
    cache: &TokenCache,
    prompt: &dyn CodePrompt,
) -> Result<Token> {
    match cache.load().await {
        Ok(Some(token)) => return Ok(token),
        Ok(None) => {
            info!(path = %cache.path().display(), "no cached token, starting authorization");
        }
        Err(e) => {
            warn!(path = %cache.path().display(), error = %e, "ignoring unreadable token cache");
        }
    }

    let token = authorize(http, secret, scope, prompt).await?;
    cache.save(&token).await?;
    Ok(token)
}
