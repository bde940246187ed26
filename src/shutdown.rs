//! Process lifetime: the runtime, signal handling, and teardown.
//!
//! The first SIGINT / SIGTERM / SIGHUP cancels the run token, which the
//! workflow observes between steps, between batch writes, and while a prompt
//! waits for input. A second signal exits with status 130.

use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// How long teardown waits for blocking threads. A prompt abandoned by an
/// interrupt leaves its stdin read parked on one of them.
const BLOCKING_GRACE: Duration = Duration::from_millis(500);

/// Run `future` on a multi-thread runtime, then shut the runtime down
/// without waiting on abandoned blocking reads.
pub(crate) fn block_on<F: Future>(future: F) -> std::io::Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let output = runtime.block_on(future);
    runtime.shutdown_timeout(BLOCKING_GRACE);
    Ok(output)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SignalAction {
    Stop,
    ForceExit,
}

/// Counts delivered signals against one run token.
struct SignalCounter {
    seen: AtomicU32,
    token: CancellationToken,
}

impl SignalCounter {
    fn new(token: CancellationToken) -> Self {
        Self {
            seen: AtomicU32::new(0),
            token,
        }
    }

    fn record(&self) -> SignalAction {
        if self.seen.fetch_add(1, Ordering::SeqCst) == 0 {
            self.token.cancel();
            SignalAction::Stop
        } else {
            SignalAction::ForceExit
        }
    }

    fn dispatch(&self) {
        match self.record() {
            SignalAction::Stop => {
                tracing::info!("Received interrupt, stopping after the current request...");
                tracing::info!("Press Ctrl+C again to force exit");
            }
            SignalAction::ForceExit => {
                tracing::warn!("Force exit requested");
                std::process::exit(130);
            }
        }
    }
}

#[cfg(unix)]
async fn listen(counter: SignalCounter) -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sighup = signal(SignalKind::hangup())?;
    loop {
        tokio::select! {
            res = tokio::signal::ctrl_c() => res?,
            _ = sigterm.recv() => {}
            _ = sighup.recv() => {}
        }
        counter.dispatch();
    }
}

#[cfg(not(unix))]
async fn listen(counter: SignalCounter) -> std::io::Result<()> {
    loop {
        tokio::signal::ctrl_c().await?;
        counter.dispatch();
    }
}

/// Install signal handlers and return the run token they cancel.
pub(crate) fn install_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let counter = SignalCounter::new(token.clone());
    tokio::spawn(async move {
        if let Err(e) = listen(counter).await {
            tracing::warn!("Signal handling unavailable, Ctrl+C will not stop cleanly: {}", e);
        }
    });
    token
}
