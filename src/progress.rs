//! Cosmetic activity spinner driven by a background task.

use std::io::IsTerminal;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// A spinner ticked by its own task until [`Spinner::finish`] cancels and
/// joins it.
pub struct Spinner {
    bar: ProgressBar,
    stop: CancellationToken,
    ticker: Option<JoinHandle<()>>,
}

impl Spinner {
    /// Start a spinner, or a hidden one when disabled or stderr (where
    /// indicatif draws) is not a TTY.
    pub fn start(enabled: bool, message: &str) -> Self {
        let bar = if enabled && std::io::stderr().is_terminal() {
            let bar = ProgressBar::new_spinner();
            bar.set_style(
                ProgressStyle::with_template("{msg} {spinner}")
                    .expect("valid template")
                    .tick_chars("|/-\\ "),
            );
            bar
        } else {
            ProgressBar::hidden()
        };
        bar.set_message(message.to_string());

        let stop = CancellationToken::new();
        let ticker = if bar.is_hidden() {
            None
        } else {
            let bar = bar.clone();
            let stop = stop.clone();
            Some(tokio::spawn(async move {
                loop {
                    tokio::select! {
                        _ = stop.cancelled() => break,
                        _ = tokio::time::sleep(TICK_INTERVAL) => bar.tick(),
                    }
                }
            }))
        };

        Self { bar, stop, ticker }
    }

    pub fn set_message(&self, message: String) {
        self.bar.set_message(message);
    }

    /// Run `f` (typically a log call) with the spinner line cleared so the
    /// output does not interleave with the redraw.
    pub fn suspend<F: FnOnce() -> R, R>(&self, f: F) -> R {
        self.bar.suspend(f)
    }

    /// Signal the ticker to stop, wait for it, and clear the line.
    pub async fn finish(mut self) {
        self.stop.cancel();
        if let Some(ticker) = self.ticker.take() {
            if let Err(e) = ticker.await {
                tracing::debug!("Spinner task ended abnormally: {}", e);
            }
        }
        self.bar.finish_and_clear();
    }
}
