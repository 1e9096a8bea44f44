//! OAuth token exchange and refresh
//!
//! Handles the two token endpoint interactions:
//! 1. Authorization code exchange (interactive flow completion)
//! 2. Token refresh (when the cached access token has expired)
//!
//! Both operations POST to the client secret's `token_uri` with different
//! grant types. `Token` is the form persisted in the token cache.

use std::fmt;

use chrono::DateTime;
use serde::{Deserialize, Deserializer, Serialize};

use crate::client_secret::ClientSecret;
use crate::constants::EXPIRY_LEEWAY_MS;
use crate::error::{Error, Result};

/// Response from the token endpoint for both exchange and refresh.
///
/// Google omits `refresh_token` on refresh responses; the caller keeps the
/// one it already has.
#[derive(Debug, Deserialize, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Seconds until the access token expires (delta, not absolute)
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// An access/refresh token pair as stored in the token cache.
///
/// `expiry` is a unix timestamp in milliseconds; `None` never expires.
/// Caches written by Go's oauth2 package store it as an RFC 3339 string
/// instead, which is accepted on load.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_expiry",
        skip_serializing_if = "Option::is_none"
    )]
    pub expiry: Option<u64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ExpiryRepr {
    Millis(u64),
    Rfc3339(String),
}

fn deserialize_expiry<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<ExpiryRepr>::deserialize(deserializer)? {
        None => Ok(None),
        Some(ExpiryRepr::Millis(ms)) => Ok(Some(ms)),
        Some(ExpiryRepr::Rfc3339(raw)) => {
            let at = DateTime::parse_from_rfc3339(&raw).map_err(serde::de::Error::custom)?;
            // Go's zero time (year 1) means no expiry
            Ok(u64::try_from(at.timestamp_millis()).ok().filter(|ms| *ms > 0))
        }
    }
}

fn default_token_type() -> String {
    "Bearer".into()
}

impl Token {
    /// Convert a token endpoint response into a storable token.
    ///
    /// `previous_refresh` is kept when the response carries no refresh token.
    pub fn from_response(
        response: TokenResponse,
        now_millis: u64,
        previous_refresh: Option<String>,
    ) -> Self {
        Self {
            access_token: response.access_token,
            token_type: response.token_type,
            refresh_token: response.refresh_token.or(previous_refresh),
            expiry: response
                .expires_in
                .map(|secs| now_millis.saturating_add(secs.saturating_mul(1000))),
        }
    }

    /// Whether the token expires within `EXPIRY_LEEWAY_MS` of `now_millis`.
    pub fn is_expired(&self, now_millis: u64) -> bool {
        match self.expiry {
            Some(expiry) => expiry <= now_millis.saturating_add(EXPIRY_LEEWAY_MS),
            None => false,
        }
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("access_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("expiry", &self.expiry)
            .finish()
    }
}

/// Current unix time in milliseconds.
pub fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Exchange an authorization code for tokens.
///
/// The verifier proves this client started the flow the code came from.
pub async fn exchange_code(
    client: &reqwest::Client,
    secret: &ClientSecret,
    code: &str,
    verifier: &str,
) -> Result<TokenResponse> {
    let response = client
        .post(&secret.token_uri)
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("code_verifier", verifier),
            ("client_id", secret.client_id.as_str()),
            ("client_secret", secret.client_secret.expose().as_str()),
            ("redirect_uri", secret.redirect_uri.as_str()),
        ])
        .send()
        .await
        .map_err(|e| Error::Http(format!("token exchange request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| String::from("<no body>"));
        return Err(Error::TokenExchange(format!(
            "token endpoint returned {status}: {body}"
        )));
    }

    response
        .json::<TokenResponse>()
        .await
        .map_err(|e| Error::TokenExchange(format!("invalid token response: {e}")))
}

/// Obtain a new access token using a refresh token.
pub async fn refresh_token(
    client: &reqwest::Client,
    secret: &ClientSecret,
    refresh: &str,
) -> Result<TokenResponse> {
    let response = client
        .post(&secret.token_uri)
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh),
            ("client_id", secret.client_id.as_str()),
            ("client_secret", secret.client_secret.expose().as_str()),
        ])
        .send()
        .await
        .map_err(|e| Error::Http(format!("token refresh request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| String::from("<no body>"));

        // Revoked or expired grants come back as 400 invalid_grant
        if status.as_u16() == 401 || status.as_u16() == 403 || body.contains("invalid_grant") {
            return Err(Error::InvalidCredentials(format!(
                "refresh token rejected ({status}): {body}"
            )));
        }

        return Err(Error::TokenExchange(format!(
            "token refresh returned {status}: {body}"
        )));
    }

    response
        .json::<TokenResponse>()
        .await
        .map_err(|e| Error::TokenExchange(format!("invalid refresh response: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::Secret;
    use mockito::Matcher;

    fn test_secret(token_uri: String) -> ClientSecret {
        let mut secret = ClientSecret::from_parts("client-123", Secret::new("shh".into()));
        secret.token_uri = token_uri;
        secret
    }

    #[test]
    fn token_response_deserializes_google_shape() {
        let json = r#"{"access_token":"ya29.abc","expires_in":3599,"refresh_token":"1//rt","scope":"https://www.googleapis.com/auth/drive","token_type":"Bearer"}"#;
        let response: TokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.access_token, "ya29.abc");
        assert_eq!(response.refresh_token.as_deref(), Some("1//rt"));
        assert_eq!(response.expires_in, Some(3599));
    }

    #[test]
    fn from_response_computes_absolute_expiry() {
        let response = TokenResponse {
            access_token: "at".into(),
            token_type: "Bearer".into(),
            refresh_token: Some("rt".into()),
            expires_in: Some(3600),
            scope: None,
        };
        let token = Token::from_response(response, 1_000, None);
        assert_eq!(token.expiry, Some(3_601_000));
        assert_eq!(token.refresh_token.as_deref(), Some("rt"));
    }

    #[test]
    fn from_response_keeps_previous_refresh_token() {
        let response = TokenResponse {
            access_token: "at2".into(),
            token_type: "Bearer".into(),
            refresh_token: None,
            expires_in: Some(60),
            scope: None,
        };
        let token = Token::from_response(response, 0, Some("rt_old".into()));
        assert_eq!(token.refresh_token.as_deref(), Some("rt_old"));
    }

    #[test]
    fn expiry_respects_leeway() {
        let token = Token {
            access_token: "at".into(),
            token_type: "Bearer".into(),
            refresh_token: None,
            expiry: Some(100_000),
        };
        assert!(!token.is_expired(80_000));
        assert!(token.is_expired(95_000));
        assert!(token.is_expired(200_000));

        let forever = Token { expiry: None, ..token };
        assert!(!forever.is_expired(u64::MAX));
    }

    #[test]
    fn debug_redacts_tokens() {
        let token = Token {
            access_token: "ya29.secret".into(),
            token_type: "Bearer".into(),
            refresh_token: Some("1//refresh".into()),
            expiry: Some(1),
        };
        let debug = format!("{token:?}");
        assert!(!debug.contains("ya29.secret"));
        assert!(!debug.contains("1//refresh"));
    }

    #[test]
    fn token_accepts_rfc3339_expiry() {
        let json = r#"{"access_token":"ya29.go","token_type":"Bearer","refresh_token":"1//go","expiry":"2024-12-29T20:20:00.5+01:00"}"#;
        let token: Token = serde_json::from_str(json).unwrap();
        assert_eq!(token.expiry, Some(1_735_500_000_500));
        assert_eq!(token.refresh_token.as_deref(), Some("1//go"));
    }

    #[test]
    fn token_zero_time_expiry_never_expires() {
        let json = r#"{"access_token":"ya29.go","token_type":"Bearer","expiry":"0001-01-01T00:00:00Z"}"#;
        let token: Token = serde_json::from_str(json).unwrap();
        assert_eq!(token.expiry, None);
    }

    #[test]
    fn token_rejects_malformed_expiry() {
        let json = r#"{"access_token":"ya29.go","expiry":"tomorrow"}"#;
        assert!(serde_json::from_str::<Token>(json).is_err());
    }

    #[test]
    fn token_serializes_expiry_as_millis() {
        let token = Token {
            access_token: "at".into(),
            token_type: "Bearer".into(),
            refresh_token: None,
            expiry: Some(1_735_500_000_000),
        };
        let json = serde_json::to_value(&token).unwrap();
        assert_eq!(json["expiry"], 1_735_500_000_000u64);
        assert!(json.get("refresh_token").is_none());
    }

    #[tokio::test]
    async fn exchange_code_posts_authorization_code_grant() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/token")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("grant_type".into(), "authorization_code".into()),
                Matcher::UrlEncoded("code".into(), "4/code".into()),
                Matcher::UrlEncoded("code_verifier".into(), "verifier".into()),
                Matcher::UrlEncoded("client_id".into(), "client-123".into()),
                Matcher::UrlEncoded("client_secret".into(), "shh".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"access_token":"at_new","refresh_token":"rt_new","expires_in":3600,"token_type":"Bearer"}"#)
            .create_async()
            .await;

        let secret = test_secret(format!("{}/token", server.url()));
        let response = exchange_code(&reqwest::Client::new(), &secret, "4/code", "verifier")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response.access_token, "at_new");
        assert_eq!(response.refresh_token.as_deref(), Some("rt_new"));
    }

    #[tokio::test]
    async fn exchange_code_surfaces_error_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/token")
            .with_status(400)
            .with_body(r#"{"error":"invalid_request"}"#)
            .create_async()
            .await;

        let secret = test_secret(format!("{}/token", server.url()));
        let err = exchange_code(&reqwest::Client::new(), &secret, "bad", "v")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::TokenExchange(ref msg) if msg.contains("400")));
    }

    #[tokio::test]
    async fn refresh_rejected_grant_is_invalid_credentials() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/token")
            .match_body(Matcher::UrlEncoded(
                "grant_type".into(),
                "refresh_token".into(),
            ))
            .with_status(400)
            .with_body(r#"{"error":"invalid_grant","error_description":"Token has been expired or revoked."}"#)
            .create_async()
            .await;

        let secret = test_secret(format!("{}/token", server.url()));
        let err = refresh_token(&reqwest::Client::new(), &secret, "rt_revoked")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidCredentials(_)), "got: {err:?}");
    }

    #[tokio::test]
    async fn refresh_server_error_is_token_exchange() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/token")
            .with_status(503)
            .create_async()
            .await;

        let secret = test_secret(format!("{}/token", server.url()));
        let err = refresh_token(&reqwest::Client::new(), &secret, "rt")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::TokenExchange(_)), "got: {err:?}");
    }
}
