use thiserror::Error;

/// Errors from the OAuth credential provider.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid client secret file: {0}")]
    ClientSecret(String),

    #[error("Token endpoint error (HTTP {status}): {error}{}", .description.as_deref().map(|d| format!(" - {d}")).unwrap_or_default())]
    TokenEndpoint {
        status: u16,
        error: String,
        description: Option<String>,
    },

    #[error(
        "Authorization requires an interactive terminal.\n\
         Run photos-album-rs once from a terminal to create the token cache."
    )]
    NotInteractive,

    #[error("Authorization was interrupted")]
    Interrupted,

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Url(#[from] url::ParseError),
}
