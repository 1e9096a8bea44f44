//! Google OAuth and Drive constants
//!
//! Endpoint defaults used when a client secret file omits them, plus the
//! fixed file names inside the application home directory.

/// Default authorization endpoint for installed applications
pub const DEFAULT_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";

/// Default token endpoint for code exchange and token refresh
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Out-of-band redirect: the consent page displays the code for manual copy.
pub const OOB_REDIRECT_URI: &str = "urn:ietf:wg:oauth:2.0:oob";

/// Full read/write access to the user's Drive.
pub const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive";

/// Client secret descriptor file name inside the home directory
pub const CLIENT_SECRET_FILE: &str = "client_secret.json";

/// Token cache file name inside the home directory
pub const TOKEN_CACHE_FILE: &str = "auth.json";

/// Tokens expiring within this many milliseconds are treated as expired.
pub const EXPIRY_LEEWAY_MS: u64 = 10_000;
