use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::registry::ConnectionRegistry;

/// Host-facing handle for reporting connectivity transitions.
///
/// The hosting shell (desktop app, browser bridge) observes the OS
/// online/offline signal and forwards it here. A restored network path is a
/// strong, time-correlated hint that retrying will succeed, so the monitor
/// skips any pending backoff window instead of waiting it out.
#[derive(Clone)]
pub struct NetworkStatus {
    tx: Arc<watch::Sender<bool>>,
}

impl NetworkStatus {
    pub(crate) fn new() -> Self {
        let (tx, _rx) = watch::channel(true);
        Self { tx: Arc::new(tx) }
    }

    /// Report that host connectivity was restored.
    pub fn online(&self) {
        let _ = self.tx.send(true);
    }

    /// Report that host connectivity was lost.
    pub fn offline(&self) {
        let _ = self.tx.send(false);
    }

    pub fn is_online(&self) -> bool {
        *self.tx.borrow()
    }

    pub(crate) fn watch(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

/// Spawn the monitor task: on every offline-to-online edge, cancel pending
/// reconnect timers and reopen every session that is not currently open.
pub(crate) fn spawn_monitor(
    registry: ConnectionRegistry,
    mut signal: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut was_online = *signal.borrow();

        while signal.changed().await.is_ok() {
            let online = *signal.borrow_and_update();
            if online && !was_online {
                tracing::info!("Network connectivity restored, retrying closed sessions");
                registry.retry_all();
            }
            was_online = online;
        }

        tracing::debug!("Network monitor finished");
    })
}
