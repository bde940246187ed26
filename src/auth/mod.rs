//! Google OAuth credential provider.
//!
//! cached token → refresh → interactive consent (out-of-band code paste).
//! The resulting token is written back to the cache after every refresh or
//! authorization.

pub mod client_secret;
pub mod endpoints;
pub mod error;
pub mod flow;
pub mod pkce;
pub mod token;

use std::io::IsTerminal;

use anyhow::Result;
use chrono::Utc;
use reqwest::Client;
use uuid::Uuid;

use self::client_secret::ClientSecret;
use self::error::AuthError;
use self::pkce::Pkce;
use self::token::{StoredToken, TokenCache};
use crate::config::AuthConfig;
use crate::prompt::{Prompt, PromptError};

/// Return a usable access token, refreshing or re-authorizing as needed.
pub async fn authenticate(
    config: &AuthConfig,
    http: &Client,
    prompt: &dyn Prompt,
) -> Result<StoredToken> {
    let cache = TokenCache::open(&config.token_cache_path).await?;
    let cached = cache.load().await;
    let now = Utc::now();

    if let Some(token) = &cached {
        if token.is_valid(now, &config.scopes) {
            tracing::debug!("Cached access token is still valid");
            return Ok(token.clone());
        }
    }

    let secret = ClientSecret::load(&config.client_secret_path).await?;

    if let Some(token) = cached.as_ref().filter(|t| t.can_refresh()) {
        if let Some(refresh_token) = token.refresh_token.as_deref() {
            tracing::debug!("Access token expired, refreshing");
            match flow::refresh(http, &secret, refresh_token).await {
                Ok(resp) => {
                    let refreshed = resp.into_stored(Utc::now(), &config.scopes, Some(token));
                    if refreshed.is_valid(Utc::now(), &config.scopes) {
                        cache.save(&refreshed).await?;
                        return Ok(refreshed);
                    }
                    tracing::info!("Refreshed token lacks the required scopes, re-authorizing");
                }
                Err(e) => {
                    tracing::warn!("Token refresh failed, re-authorizing: {}", e);
                }
            }
        }
    }

    let token = authorize_interactively(config, http, &secret, prompt).await?;
    cache.save(&token).await?;
    tracing::debug!("Token cached at {}", cache.path().display());
    Ok(token)
}

async fn authorize_interactively(
    config: &AuthConfig,
    http: &Client,
    secret: &ClientSecret,
    prompt: &dyn Prompt,
) -> Result<StoredToken> {
    // The operator has to paste a code back; that cannot work without a TTY
    if !std::io::stdin().is_terminal() {
        return Err(AuthError::NotInteractive.into());
    }
    run_consent(config, http, secret, prompt).await
}

async fn run_consent(
    config: &AuthConfig,
    http: &Client,
    secret: &ClientSecret,
    prompt: &dyn Prompt,
) -> Result<StoredToken> {
    let pkce = Pkce::generate();
    let state = Uuid::new_v4().to_string();
    let url = flow::authorization_url(secret, &config.scopes, &config.redirect_uri, &state, &pkce)?;

    tracing::info!("Please go to this URL and authorize the application: {}", url);
    let code = match prompt.ask("Enter the authorization code: ").await {
        Ok(code) => code,
        Err(PromptError::Interrupted) => return Err(AuthError::Interrupted.into()),
        Err(e) => return Err(e.into()),
    };
    if code.is_empty() {
        anyhow::bail!("No authorization code entered");
    }

    let resp = flow::exchange_code(http, secret, &code, &config.redirect_uri, &pkce).await?;
    Ok(resp.into_stored(Utc::now(), &config.scopes, None))
}
