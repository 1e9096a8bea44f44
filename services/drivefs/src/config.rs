//! Configuration types and loading
//!
//! Config precedence: CLI args > env vars > config file > defaults.
//! The home directory holds `client_secret.json` and the token cache; it
//! defaults to `$HOME/.drivefs` and can be overridden with DRIVEFS_HOME.

use std::path::{Path, PathBuf};

use common::Secret;
use drive_auth::Token;
use serde::Deserialize;

/// Root configuration
#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default = "default_home_dir")]
    pub home_dir: PathBuf,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Inline client credentials; takes precedence over `client_secret.json`
    #[serde(default)]
    pub client_secret: Option<InlineClientSecret>,
    /// Token that seeds an empty token cache
    #[serde(default)]
    pub auth: Option<Token>,
    #[serde(default)]
    pub options: Options,
}

#[derive(Debug, Deserialize)]
pub struct InlineClientSecret {
    pub client_id: String,
    pub client_secret: Secret<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Options {
    /// Expose the drive read-only
    #[serde(default)]
    pub safemode: bool,
}

fn default_home_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".drivefs")
}

fn default_timeout() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            home_dir: default_home_dir(),
            timeout_secs: default_timeout(),
            client_secret: None,
            auth: None,
            options: Options::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file, then overlay environment variables.
    pub fn load(path: &Path) -> common::Result<Self> {
        if !path.exists() {
            return Err(common::Error::NotFound(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&contents)?;
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Load `path` when it exists, otherwise fall back to defaults.
    ///
    /// Only used for the implicit default path; an explicitly named file
    /// that is missing goes through `load` and fails.
    pub fn load_or_default(path: &Path) -> common::Result<Self> {
        if path.exists() {
            return Self::load(path);
        }
        let mut config = Config::default();
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(home) = std::env::var("DRIVEFS_HOME") {
            if !home.trim().is_empty() {
                self.home_dir = PathBuf::from(home);
            }
        }
    }

    fn validate(&self) -> common::Result<()> {
        if self.timeout_secs == 0 {
            return Err(common::Error::Config(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        if let Some(inline) = &self.client_secret {
            if inline.client_id.trim().is_empty() {
                return Err(common::Error::Config(
                    "client_secret.client_id must not be empty".into(),
                ));
            }
        }

        if let Some(auth) = &self.auth {
            if auth.access_token.trim().is_empty() {
                return Err(common::Error::Config(
                    "auth.access_token must not be empty".into(),
                ));
            }
        }

        Ok(())
    }

    /// Location of the vendor client secret descriptor.
    pub fn client_secret_path(&self) -> PathBuf {
        self.home_dir.join(drive_auth::CLIENT_SECRET_FILE)
    }

    /// Resolve config file path from CLI arg or DRIVEFS_CONFIG env var.
    ///
    /// Returns the path and whether it was named explicitly.
    pub fn resolve_path(cli_path: Option<&str>) -> (PathBuf, bool) {
        if let Some(p) = cli_path {
            return (PathBuf::from(p), true);
        }
        if let Ok(p) = std::env::var("DRIVEFS_CONFIG") {
            return (PathBuf::from(p), true);
        }
        (PathBuf::from("drivefs.toml"), false)
    }
}
