//! Operator prompts (authorization code, alternate album name).
//!
//! Reads happen on a blocking thread so the runtime keeps servicing the
//! signal handler; an interrupt while waiting resolves the prompt with
//! [`PromptError::Interrupted`].

use std::io::{self, Write};

use thiserror::Error;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("Interrupted while waiting for input")]
    Interrupted,

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Join(#[from] tokio::task::JoinError),
}

#[async_trait::async_trait]
pub trait Prompt: Send + Sync {
    /// Show `message` and return the operator's answer with surrounding
    /// whitespace trimmed.
    async fn ask(&self, message: &str) -> Result<String, PromptError>;
}

/// Prompts on stdout and reads one line from stdin.
pub struct StdinPrompt {
    shutdown: CancellationToken,
}

impl StdinPrompt {
    pub fn new(shutdown: CancellationToken) -> Self {
        Self { shutdown }
    }
}

#[async_trait::async_trait]
impl Prompt for StdinPrompt {
    async fn ask(&self, message: &str) -> Result<String, PromptError> {
        let message = message.to_string();
        let read = tokio::task::spawn_blocking(move || {
            print!("{message}");
            io::stdout().flush()?;
            let mut line = String::new();
            io::stdin().read_line(&mut line)?;
            Ok::<String, io::Error>(line.trim().to_string())
        });

        tokio::select! {
            answer = read => Ok(answer??),
            _ = self.shutdown.cancelled() => Err(PromptError::Interrupted),
        }
    }
}
