use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use fs4::fs_std::FileExt;
use serde::{Deserialize, Serialize};
use tokio::fs;

/// Treat a token as expired this long before its actual expiry so a request
/// started right before the deadline does not go out with a dead token.
const EXPIRY_LEEWAY_SECS: i64 = 60;

/// OAuth token as persisted in the cache file.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredToken {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub scopes: Vec<String>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl std::fmt::Debug for StoredToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredToken")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("expires_at", &self.expires_at)
            .field("scopes", &self.scopes)
            .finish()
    }
}

impl StoredToken {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(at) => at - Duration::seconds(EXPIRY_LEEWAY_SECS) <= now,
            None => false,
        }
    }

    /// Usable as-is: not expired and granted every scope we need.
    pub fn is_valid(&self, now: DateTime<Utc>, required_scopes: &[String]) -> bool {
        !self.access_token.is_empty()
            && !self.is_expired(now)
            && required_scopes.iter().all(|s| self.scopes.contains(s))
    }

    pub fn can_refresh(&self) -> bool {
        self.refresh_token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// Token cache file plus an exclusive lock held for the lifetime of the
/// value, so two runs cannot rewrite the same cache concurrently.
pub struct TokenCache {
    path: PathBuf,
    /// Released when the file handle is dropped.
    #[allow(dead_code)]
    lock_file: std::fs::File,
}

impl TokenCache {
    pub async fn open(path: &Path) -> Result<Self> {
        let path = path.to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create token cache directory: {}", parent.display())
            })?;
        }

        let mut lock_name = path.as_os_str().to_owned();
        lock_name.push(".lock");
        let lock_path = PathBuf::from(lock_name);
        let lock_file = tokio::task::spawn_blocking(move || {
            let file = std::fs::File::create(&lock_path).with_context(|| {
                format!("Failed to create lock file: {}", lock_path.display())
            })?;
            FileExt::try_lock_exclusive(&file).map_err(|_| {
                anyhow::anyhow!(
                    "Another photos-album-rs instance is using this token cache (lock: {})",
                    lock_path.display()
                )
            })?;
            Ok::<std::fs::File, anyhow::Error>(file)
        })
        .await??;

        Ok(Self { path, lock_file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the cached token. A missing or unreadable cache yields `None`.
    pub async fn load(&self) -> Option<StoredToken> {
        let contents = match fs::read_to_string(&self.path).await {
            Ok(c) => c,
            Err(_) => {
                tracing::info!("Token cache does not exist");
                return None;
            }
        };
        match serde_json::from_str::<StoredToken>(&contents) {
            Ok(token) => {
                tracing::debug!("Loaded token from {}", self.path.display());
                Some(token)
            }
            Err(_) => {
                tracing::info!("Token cache corrupt, starting fresh");
                None
            }
        }
    }

    pub async fn save(&self, token: &StoredToken) -> Result<()> {
        let json = serde_json::to_string_pretty(token)?;
        fs::write(&self.path, json).await.with_context(|| {
            format!("Failed to write token cache to {}", self.path.display())
        })?;
        #[cfg(unix)]
        {
            // The cache holds a refresh token; restrict to owner-only
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&self.path, perms)?;
        }
        tracing::debug!("Saved token to {}", self.path.display());
        Ok(())
    }
}
