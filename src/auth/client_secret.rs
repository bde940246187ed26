use std::path::Path;

use serde::Deserialize;

use super::endpoints::{AUTH_URI, TOKEN_URI};
use super::error::AuthError;

/// OAuth client credentials as downloaded from the Google Cloud console.
#[derive(Clone, Deserialize)]
pub struct ClientSecret {
    pub client_id: String,
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl std::fmt::Debug for ClientSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientSecret")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("auth_uri", &self.auth_uri)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

fn default_auth_uri() -> String {
    AUTH_URI.to_string()
}

fn default_token_uri() -> String {
    TOKEN_URI.to_string()
}

/// The console wraps the credentials in an `installed` or `web` object
/// depending on the client type.
#[derive(Deserialize)]
struct ClientSecretFile {
    installed: Option<ClientSecret>,
    web: Option<ClientSecret>,
}

impl ClientSecret {
    pub fn from_json(contents: &str) -> Result<Self, AuthError> {
        let file: ClientSecretFile = serde_json::from_str(contents)?;
        let secret = file.installed.or(file.web).ok_or_else(|| {
            AuthError::ClientSecret("expected an \"installed\" or \"web\" client".into())
        })?;
        if secret.client_id.is_empty() {
            return Err(AuthError::ClientSecret("client_id is empty".into()));
        }
        Ok(secret)
    }

    pub async fn load(path: &Path) -> Result<Self, AuthError> {
        let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
            AuthError::ClientSecret(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&contents)
    }
}
