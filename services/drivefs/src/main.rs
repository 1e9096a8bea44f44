//! drivefs credential bootstrap
//!
//! Single binary that:
//! 1. Loads configuration and the OAuth client secret
//! 2. Reuses the cached Drive token, or walks the user through consent
//! 3. Builds the authenticated Drive handle and checks it with `about`

mod config;
mod error;
mod startup;

use anyhow::{Context, Result};
use drive_auth::ConsolePrompt;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

/// Command-line flags: `--config <path>` and `--reauth`.
#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    config: Option<String>,
    reauth: bool,
}

impl CliArgs {
    fn parse(args: &[String]) -> Self {
        let config = args
            .iter()
            .position(|a| a == "--config")
            .and_then(|i| args.get(i + 1))
            .cloned();
        let reauth = args.iter().any(|a| a == "--reauth");
        Self { config, reauth }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // JSON logs on stderr; stdout is reserved for the consent prompt
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_env("LOG_LEVEL")
                .or_else(|_| EnvFilter::try_from_default_env())
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr),
        )
        .init();

    info!("starting drivefs");

    let args: Vec<String> = std::env::args().collect();
    let cli = CliArgs::parse(&args);

    let (config_path, explicit) = Config::resolve_path(cli.config.as_deref());
    info!(path = %config_path.display(), explicit, "loading configuration");

    let config = if explicit {
        Config::load(&config_path)
    } else {
        Config::load_or_default(&config_path)
    }
    .with_context(|| format!("failed to load config from {}", config_path.display()))?;

    info!(
        home_dir = %config.home_dir.display(),
        inline_client_secret = config.client_secret.is_some(),
        inline_auth = config.auth.is_some(),
        safemode = config.options.safemode,
        "configuration loaded"
    );

    let service = startup::init_client(&config, &ConsolePrompt, cli.reauth)
        .await
        .context("failed to initialize Drive client")?;

    let about = service
        .about()
        .await
        .context("failed to query Drive account")?;

    info!(
        user = %about.user.display_name,
        email = %about.user.email_address,
        safemode = service.is_safemode(),
        "drive client ready"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_config_and_reauth() {
        let cli = CliArgs::parse(&args(&["drivefs", "--config", "/etc/drivefs.toml", "--reauth"]));
        assert_eq!(cli.config.as_deref(), Some("/etc/drivefs.toml"));
        assert!(cli.reauth);
    }

    #[test]
    fn no_flags_yield_defaults() {
        assert_eq!(CliArgs::parse(&args(&["drivefs"])), CliArgs::default());
    }

    #[test]
    fn dangling_config_flag_is_ignored() {
        let cli = CliArgs::parse(&args(&["drivefs", "--config"]));
        assert!(cli.config.is_none());
    }
}
