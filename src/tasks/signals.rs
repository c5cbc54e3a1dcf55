//! Termination Signal Task
//!
//! Dumps the store on SIGINT, SIGTERM or SIGQUIT, then exits the process.

use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::cache::CacheEngine;
use crate::sink::TerminationSignal;

/// Waits for the first of SIGINT, SIGTERM or SIGQUIT.
#[cfg(unix)]
pub async fn wait_for_termination() -> std::io::Result<TerminationSignal> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;
    let mut quit = signal(SignalKind::quit())?;

    let received = tokio::select! {
        _ = interrupt.recv() => TerminationSignal::Interrupt,
        _ = terminate.recv() => TerminationSignal::Terminate,
        _ = quit.recv() => TerminationSignal::Quit,
    };
    Ok(received)
}

/// Waits for Ctrl+C, the only termination signal observed off unix.
#[cfg(not(unix))]
pub async fn wait_for_termination() -> std::io::Result<TerminationSignal> {
    tokio::signal::ctrl_c().await?;
    Ok(TerminationSignal::Interrupt)
}

/// Spawns the termination handler for `engine`.
///
/// On a signal the whole store is dumped with the signal's reason tag and the
/// process exits with 0 for SIGINT, 1 otherwise.
pub fn spawn_signal_task(engine: CacheEngine) -> JoinHandle<()> {
    tokio::spawn(async move {
        match wait_for_termination().await {
            Ok(signal) => {
                info!(
                    "Received {}, dumping cache '{}' before exit",
                    signal.name(),
                    engine.name()
                );
                engine.dump_and_exit(signal).await;
            }
            Err(err) => {
                warn!(
                    "Cache '{}' could not install termination handlers: {}",
                    engine.name(),
                    err
                );
            }
        }
    })
}
