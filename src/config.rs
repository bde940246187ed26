use std::path::PathBuf;

use crate::auth::endpoints::{OOB_REDIRECT_URI, PHOTOS_LIBRARY_SCOPE};

/// Snapshot of the run options. Built once at startup and only read afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
    pub year: i32,
    pub dry_run: bool,
    pub verbose: bool,
    pub include_archived: bool,
    pub no_progress_bar: bool,
}

impl RunConfig {
    pub fn default_album_title(&self) -> String {
        format!("Photos from {}", self.year)
    }
}

/// Everything the credential provider needs, passed in explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    pub client_secret_path: PathBuf,
    pub token_cache_path: PathBuf,
    pub scopes: Vec<String>,
    pub redirect_uri: String,
}

/// Application configuration.
pub struct Config {
    pub run: RunConfig,
    pub auth: AuthConfig,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("run", &self.run)
            .field("client_secret_path", &self.auth.client_secret_path)
            .field("token_cache_path", &self.auth.token_cache_path)
            .field("scopes", &self.auth.scopes)
            .finish_non_exhaustive()
    }
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

impl Config {
    pub fn from_cli(cli: crate::cli::Cli) -> Self {
        Self {
            run: RunConfig {
                year: cli.year,
                dry_run: !cli.no_dryrun,
                verbose: cli.verbose,
                include_archived: cli.include_archived,
                no_progress_bar: cli.no_progress_bar,
            },
            auth: AuthConfig {
                client_secret_path: expand_tilde(&cli.client_secret),
                token_cache_path: expand_tilde(&cli.token_cache),
                scopes: vec![PHOTOS_LIBRARY_SCOPE.to_string()],
                redirect_uri: OOB_REDIRECT_URI.to_string(),
            },
        }
    }
}
