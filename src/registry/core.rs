use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::infrastructure::TaskSlot;
use crate::manager::TransportOptions;
use crate::session::{ChannelSession, SessionState};
use crate::types::error::{Result, TransportError};
use crate::types::ChannelId;

struct RegistryEntry {
    session: Arc<ChannelSession>,
    leases: usize,
    teardown: TaskSlot,
}

struct RegistryShared {
    endpoint: String,
    options: TransportOptions,
    entries: Mutex<HashMap<ChannelId, RegistryEntry>>,
}

/// Process-wide table of live channel sessions.
///
/// Single source of truth mapping channel id to (session, lease count).
/// However many surfaces subscribe to a channel, at most one physical
/// connection is ever open for it; the last lease going away arms a
/// deferred teardown so rapid remount churn reuses the socket instead of
/// reconnecting.
///
/// The map lock is never held across an await.
#[derive(Clone)]
pub struct ConnectionRegistry {
    shared: Arc<RegistryShared>,
}

impl ConnectionRegistry {
    pub(crate) fn new(endpoint: String, options: TransportOptions) -> Self {
        Self {
            shared: Arc::new(RegistryShared {
                endpoint,
                options,
                entries: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Lease the session for a channel, creating and connecting it if no
    /// live one exists. Rejects synchronously when the credential is
    /// missing; every other failure surfaces through the session's own
    /// state transitions.
    pub fn acquire(&self, channel: ChannelId, token: &str) -> Result<Arc<ChannelSession>> {
        if token.is_empty() {
            return Err(TransportError::MissingCredential);
        }

        let mut entries = self.shared.entries.lock().unwrap();

        if let Some(entry) = entries.get_mut(&channel) {
            entry.teardown.cancel();
            entry.leases += 1;
            tracing::debug!("Channel {}: reusing session ({} leases)", channel, entry.leases);
            let session = Arc::clone(&entry.session);
            drop(entries);
            session.ensure_open();
            return Ok(session);
        }

        let session = ChannelSession::new(
            channel,
            token.to_string(),
            self.shared.endpoint.clone(),
            self.shared.options.clone(),
        );
        entries.insert(
            channel,
            RegistryEntry {
                session: Arc::clone(&session),
                leases: 1,
                teardown: TaskSlot::new(),
            },
        );
        drop(entries);

        tracing::info!("Channel {}: registering new session", channel);
        session.open();
        Ok(session)
    }

    /// Return a lease. When the last one goes, teardown is deferred by the
    /// grace window; a re-acquire inside the window keeps the session.
    pub fn release(&self, channel: ChannelId) {
        let mut entries = self.shared.entries.lock().unwrap();
        let Some(entry) = entries.get_mut(&channel) else {
            tracing::warn!("Channel {}: release without a registered session", channel);
            return;
        };

        entry.leases = entry.leases.saturating_sub(1);
        if entry.leases > 0 {
            tracing::debug!("Channel {}: {} leases remain", channel, entry.leases);
            return;
        }

        let shared = Arc::clone(&self.shared);
        let grace = self.shared.options.teardown_grace;
        tracing::debug!("Channel {}: no leases left, teardown in {:?}", channel, grace);
        entry.teardown.arm(tokio::spawn(async move {
            tokio::time::sleep(grace).await;

            let session = {
                let mut entries = shared.entries.lock().unwrap();
                match entries.get(&channel) {
                    // Still unleased after the grace window: retire for real.
                    Some(entry) if entry.leases == 0 => entries.remove(&channel).map(|entry| {
                        entry.teardown.disarm();
                        entry.session
                    }),
                    _ => None,
                }
            };

            if let Some(session) = session {
                tracing::info!("Channel {}: grace period elapsed, tearing down", channel);
                session.close().await;
            }
        }));
    }

    /// Immediate, unconditional teardown regardless of lease count. Used
    /// on logout and deliberate channel switches.
    pub async fn force_close(&self, channel: ChannelId) {
        let entry = self.shared.entries.lock().unwrap().remove(&channel);
        if let Some(entry) = entry {
            entry.teardown.cancel();
            tracing::info!("Channel {}: force closing", channel);
            entry.session.close().await;
        }
    }

    /// Cancel pending backoff timers and reopen every session that is not
    /// currently open. Driven by the network monitor.
    pub(crate) fn retry_all(&self) {
        let stale: Vec<Arc<ChannelSession>> = {
            let entries = self.shared.entries.lock().unwrap();
            entries
                .values()
                .filter(|entry| entry.session.state() != SessionState::Open)
                .map(|entry| Arc::clone(&entry.session))
                .collect()
        };

        for session in stale {
            session.retry_now();
        }
    }

    /// Channels with a registered session.
    pub(crate) fn channels(&self) -> Vec<ChannelId> {
        self.shared.entries.lock().unwrap().keys().copied().collect()
    }

    /// Number of registered sessions (one per channel at most).
    pub fn session_count(&self) -> usize {
        self.shared.entries.lock().unwrap().len()
    }

    #[cfg(test)]
    pub(crate) fn lease_count(&self, channel: ChannelId) -> Option<usize> {
        self.shared
            .entries
            .lock()
            .unwrap()
            .get(&channel)
            .map(|entry| entry.leases)
    }
}
