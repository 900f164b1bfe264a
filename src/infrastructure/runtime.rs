//! Process runtime: interrupt handling around the supervisor.

use tokio::signal;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::application::{RelayState, Supervisor};
use crate::port::MailConnector;

/// Run the supervisor until Ctrl-C, then return the final state.
pub async fn run_until_interrupted<C: MailConnector>(supervisor: Supervisor<C>) -> RelayState {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let interrupt = tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown signal received");
                let _ = shutdown_tx.send(true);
            }
            Err(e) => {
                warn!(error = %e, "Cannot listen for Ctrl-C; stop the process externally");
                // Keep the sender alive so the supervisor does not see a stop
                std::future::pending::<()>().await;
            }
        }
    });

    let state = run_with_shutdown(supervisor, shutdown_rx).await;
    interrupt.abort();
    state
}

/// Run with an externally controlled shutdown signal.
pub async fn run_with_shutdown<C: MailConnector>(
    supervisor: Supervisor<C>,
    shutdown: watch::Receiver<bool>,
) -> RelayState {
    info!("Starting mailsignal relay");
    let state = supervisor.run(shutdown).await;
    info!("mailsignal stopped");
    state
}
