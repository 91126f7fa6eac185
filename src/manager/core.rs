use std::sync::Arc;

use tokio::sync::mpsc;

use super::{RealtimeManagerBuilder, Subscription, TransportOptions};
use crate::infrastructure::{NetworkStatus, TaskSlot};
use crate::registry::ConnectionRegistry;
use crate::types::error::Result;
use crate::types::ChannelId;

/// The entry point for realtime channel subscriptions.
///
/// One manager serves the whole process: it owns the connection registry,
/// deduplicates sessions per channel, and fans each channel's event stream
/// out to every subscriber. Construct it once at startup and hand clones to
/// the surfaces that need it (clones share all state).
///
/// # Example
///
/// ```no_run
/// use collab_realtime::{ChannelId, RealtimeManager, TransportOptions};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let manager = RealtimeManager::new(
///     "wss://collab.example/api/chat/ws",
///     TransportOptions::default(),
/// )?;
///
/// let mut subscription = manager.subscribe(ChannelId(42), "bearer-token");
/// while let Some(event) = subscription.next_event().await {
///     println!("channel event: {}", event);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RealtimeManager {
    pub(crate) registry: ConnectionRegistry,
    pub(crate) network: NetworkStatus,
    pub(crate) options: TransportOptions,
    pub(crate) _monitor: Arc<TaskSlot>,
}

impl RealtimeManager {
    /// Create a manager for the given channel-addressing endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::UrlParse`](crate::TransportError::UrlParse)
    /// for a malformed endpoint and
    /// [`TransportError::Connection`](crate::TransportError::Connection) for
    /// a non-WebSocket scheme.
    pub fn new(endpoint: impl Into<String>, options: TransportOptions) -> Result<Self> {
        RealtimeManagerBuilder::new(endpoint, options).map(|builder| builder.build())
    }

    /// Subscribe to a channel's event stream.
    ///
    /// The first subscriber for a channel opens the connection; later ones
    /// share it. Subscribing with an empty token or the unassigned channel
    /// id returns an inert handle instead of erroring — UI code legitimately
    /// subscribes before auth or the directory lookup completes, and gets
    /// silence rather than a failure to handle.
    pub fn subscribe(&self, channel: ChannelId, token: &str) -> Subscription {
        if token.is_empty() || channel.is_unassigned() {
            tracing::debug!(
                "Channel {}: subscribe before credentials are ready, returning inert handle",
                channel
            );
            return Subscription::inert(channel);
        }

        match self.registry.acquire(channel, token) {
            Ok(session) => {
                let (tx, rx) = mpsc::channel(self.options.event_buffer);
                let listener_id = session.attach(tx);
                // A closure racing this attach may have found no listeners
                // and skipped its reconnect; the new lease revives it.
                session.ensure_open();
                Subscription::live(channel, session, listener_id, self.registry.clone(), rx)
            }
            Err(e) => {
                tracing::warn!("Channel {}: subscription rejected: {}", channel, e);
                Subscription::inert(channel)
            }
        }
    }

    /// Tear down a channel's session immediately, regardless of how many
    /// subscribers hold leases. For deliberate channel switches.
    pub async fn force_close(&self, channel: ChannelId) {
        self.registry.force_close(channel).await;
    }

    /// Tear down every session. The logout path.
    pub async fn shutdown(&self) {
        for channel in self.registry.channels() {
            self.registry.force_close(channel).await;
        }
    }

    /// Handle for the host shell to report connectivity transitions.
    pub fn network(&self) -> NetworkStatus {
        self.network.clone()
    }

    /// Number of live sessions (at most one per channel).
    pub fn session_count(&self) -> usize {
        self.registry.session_count()
    }
}
