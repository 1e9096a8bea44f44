//! Configuration error types shared by the drivefs crates

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result alias using common Error
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_includes_context() {
        let config_err = Error::Config("home_dir must be absolute".into());
        assert_eq!(
            config_err.to_string(),
            "Configuration error: home_dir must be absolute"
        );

        let missing = Error::NotFound(PathBuf::from("/etc/drivefs.toml"));
        assert_eq!(missing.to_string(), "config file not found: /etc/drivefs.toml");

        let io_err = Error::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        assert!(io_err.to_string().starts_with("I/O error:"), "got: {io_err}");
    }

    #[test]
    fn toml_errors_convert() {
        let parsed: std::result::Result<toml::Value, _> = toml::from_str("not valid {{{{ toml");
        let err: Error = parsed.unwrap_err().into();
        assert!(format!("{err:?}").contains("Toml"), "got: {err:?}");
    }
}
