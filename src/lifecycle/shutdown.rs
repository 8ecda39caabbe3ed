//! Shutdown coordination for the gateway.

use tokio::sync::broadcast;

/// Broadcast-based shutdown coordinator.
///
/// Long-running tasks each hold a [`broadcast::Receiver`]; a single trigger
/// reaches all of them. Receivers subscribed after the trigger fired miss it,
/// so subscribe before spawning.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Trigger the shutdown signal.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Spawn a task that triggers shutdown when the process receives
    /// SIGINT or SIGTERM.
    pub fn trigger_on_signal(&self) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            crate::lifecycle::signals::shutdown_signal().await;
            tracing::info!("Shutdown signal received");
            let _ = tx.send(());
        });
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
