use serde::Deserialize;
use thiserror::Error;

/// Errors from the Photos Library API.
#[derive(Debug, Error)]
pub enum PhotosError {
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected response: {0}")]
    InvalidResponse(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Google's standard error envelope: `{"error": {"code", "message", "status"}}`.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

impl PhotosError {
    /// Build an `Api` error from a non-success response body, keeping the
    /// provider's message when the body is the standard envelope.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(env) => match env.error.status {
                Some(s) if !s.is_empty() => format!("{} ({})", env.error.message, s),
                _ => env.error.message,
            },
            Err(_) if body.trim().is_empty() => "<empty body>".to_string(),
            Err(_) => body.trim().to_string(),
        };
        PhotosError::Api { status, message }
    }
}
