//! photos-album-rs: gather a year's Google Photos into one album.
//!
//! Authenticates against the Photos Library API with an installed-app OAuth
//! flow, finds or creates the "Photos from <year>" album, searches the
//! library for everything captured that year, and adds it in batches.
//! Dry run is the default; nothing is written until `--no-dryrun`.

#![warn(clippy::all)]

mod auth;
mod cli;
mod config;
mod photos;
mod progress;
mod prompt;
mod shutdown;
mod types;
mod workflow;

use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use auth::error::AuthError;
use config::Config;
use photos::PhotosClient;
use prompt::StdinPrompt;
use workflow::Outcome;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

fn main() -> anyhow::Result<()> {
    let config = Config::from_cli(cli::Cli::parse());

    let filter = if config.run.verbose {
        "photos_album_rs=debug,info"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();
    tracing::debug!(?config, "Resolved configuration");

    // Failures are reported through the log; the exit status stays 0.
    shutdown::block_on(async {
        if let Err(e) = run(&config).await {
            tracing::error!("An error occurred: {:?}", e);
        }
    })?;
    Ok(())
}

async fn run(config: &Config) -> anyhow::Result<()> {
    let shutdown_token = shutdown::install_signal_handler();

    tracing::info!(
        "Welcome to photos-album-rs. Creating the album for {}{}",
        config.run.year,
        if config.run.dry_run { " (dry run)" } else { "" }
    );

    let http = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;
    let prompt = StdinPrompt::new(shutdown_token.clone());

    tracing::info!("Authenticating...");
    let token = match auth::authenticate(&config.auth, &http, &prompt).await {
        Ok(token) => token,
        Err(e) if matches!(e.downcast_ref::<AuthError>(), Some(AuthError::Interrupted)) => {
            workflow::report(&Outcome::Interrupted, &config.run);
            return Ok(());
        }
        Err(e) => return Err(e),
    };
    if shutdown_token.is_cancelled() {
        workflow::report(&Outcome::Interrupted, &config.run);
        return Ok(());
    }
    tracing::info!("Authentication successful");

    let api = PhotosClient::new(http, token.access_token);
    let outcome = workflow::create_year_album(&api, &prompt, &config.run, &shutdown_token).await?;
    workflow::report(&outcome, &config.run);
    Ok(())
}
