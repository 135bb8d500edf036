// src/engine/signals.rs

use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::engine::ReactorEvent;

/// Spawn the interrupt listener.
///
/// The SIGTERM handler is installed before this returns, so a SIGTERM raised
/// afterwards is always delivered as [`ReactorEvent::Interrupt`]. Ctrl-C
/// does the same. The listener never touches the tracked process; the
/// reactor does the killing.
///
/// Must be called from within a Tokio runtime.
pub fn spawn_interrupt_listener(
    tx: mpsc::Sender<ReactorEvent>,
) -> std::io::Result<JoinHandle<()>> {
    let mut terminate = signal(SignalKind::terminate())?;

    Ok(tokio::spawn(async move {
        tokio::select! {
            res = tokio::signal::ctrl_c() => {
                if let Err(err) = res {
                    warn!(error = %err, "failed to listen for Ctrl-C");
                    return;
                }
                info!("Ctrl-C received");
            }
            _ = terminate.recv() => info!("SIGTERM received"),
        }
        let _ = tx.send(ReactorEvent::Interrupt).await;
    }))
}
