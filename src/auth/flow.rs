//! Installed-app OAuth flow against Google's authorization server:
//! consent URL, code exchange, and refresh.

use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use super::client_secret::ClientSecret;
use super::error::AuthError;
use super::pkce::Pkce;
use super::token::StoredToken;

/// Successful token endpoint response.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

impl TokenResponse {
    /// Merge into a cache entry. A refresh response usually omits the refresh
    /// token and sometimes the scope; both carry over from `previous`.
    pub fn into_stored(
        self,
        now: DateTime<Utc>,
        requested_scopes: &[String],
        previous: Option<&StoredToken>,
    ) -> StoredToken {
        let scopes = match self.scope {
            Some(s) if !s.trim().is_empty() => s.split_whitespace().map(str::to_string).collect(),
            _ => previous
                .map(|p| p.scopes.clone())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| requested_scopes.to_vec()),
        };
        StoredToken {
            access_token: self.access_token,
            refresh_token: self
                .refresh_token
                .filter(|t| !t.is_empty())
                .or_else(|| previous.and_then(|p| p.refresh_token.clone())),
            expires_at: self.expires_in.map(|secs| now + Duration::seconds(secs)),
            token_type: self.token_type.unwrap_or_else(|| "Bearer".to_string()),
            scopes,
        }
    }
}

/// Build the consent URL the operator opens in a browser.
pub fn authorization_url(
    secret: &ClientSecret,
    scopes: &[String],
    redirect_uri: &str,
    state: &str,
    pkce: &Pkce,
) -> Result<Url, AuthError> {
    let mut url = Url::parse(&secret.auth_uri)?;
    url.query_pairs_mut()
        .append_pair("response_type", "code")
        .append_pair("client_id", &secret.client_id)
        .append_pair("redirect_uri", redirect_uri)
        .append_pair("scope", &scopes.join(" "))
        .append_pair("state", state)
        .append_pair("access_type", "offline")
        .append_pair("prompt", "consent")
        .append_pair("code_challenge", &pkce.challenge)
        .append_pair("code_challenge_method", "S256");
    Ok(url)
}

/// Trade an authorization code for tokens.
pub async fn exchange_code(
    client: &Client,
    secret: &ClientSecret,
    code: &str,
    redirect_uri: &str,
    pkce: &Pkce,
) -> Result<TokenResponse, AuthError> {
    let mut form = vec![
        ("grant_type", "authorization_code"),
        ("code", code),
        ("client_id", secret.client_id.as_str()),
        ("redirect_uri", redirect_uri),
        ("code_verifier", pkce.verifier.as_str()),
    ];
    if let Some(client_secret) = secret.client_secret.as_deref() {
        form.push(("client_secret", client_secret));
    }
    post_token_request(client, &secret.token_uri, &form).await
}

/// Obtain a fresh access token from a refresh token.
pub async fn refresh(
    client: &Client,
    secret: &ClientSecret,
    refresh_token: &str,
) -> Result<TokenResponse, AuthError> {
    let mut form = vec![
        ("grant_type", "refresh_token"),
        ("refresh_token", refresh_token),
        ("client_id", secret.client_id.as_str()),
    ];
    if let Some(client_secret) = secret.client_secret.as_deref() {
        form.push(("client_secret", client_secret));
    }
    post_token_request(client, &secret.token_uri, &form).await
}

async fn post_token_request(
    client: &Client,
    token_uri: &str,
    form: &[(&str, &str)],
) -> Result<TokenResponse, AuthError> {
    tracing::debug!("POST {}", token_uri);
    let response = client.post(token_uri).form(form).send().await?;
    let status = response.status();
    let text = response.text().await?;
    if !status.is_success() {
        let (error, description) = match serde_json::from_str::<TokenErrorResponse>(&text) {
            Ok(e) => (e.error, e.error_description),
            Err(_) => (text, None),
        };
        return Err(AuthError::TokenEndpoint {
            status: status.as_u16(),
            error,
            description,
        });
    }
    Ok(serde_json::from_str(&text)?)
}
