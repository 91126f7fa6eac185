use std::sync::Arc;

use serde_json::Value;
use tokio::sync::{mpsc, watch};

use crate::registry::ConnectionRegistry;
use crate::session::{ChannelSession, SessionState};
use crate::types::error::{Result, TransportError};
use crate::types::{ChannelId, ChatPayload};

struct SubscriptionInner {
    session: Arc<ChannelSession>,
    listener_id: u64,
    registry: ConnectionRegistry,
}

/// A consumer's lease on a shared channel session.
///
/// Holding a subscription keeps the session alive and delivers its event
/// stream; it does not own the connection. Dropping the handle (or calling
/// [`unsubscribe`](Self::unsubscribe)) detaches the listener and returns
/// the lease — the connection itself survives the grace window in case the
/// same surface remounts immediately.
///
/// A subscription created without a credential or channel id is *inert*:
/// the event stream ends immediately, sends report not-connected, and no
/// connection is ever attempted.
pub struct Subscription {
    channel: ChannelId,
    events: mpsc::Receiver<Value>,
    inner: Option<SubscriptionInner>,
}

impl Subscription {
    pub(crate) fn live(
        channel: ChannelId,
        session: Arc<ChannelSession>,
        listener_id: u64,
        registry: ConnectionRegistry,
        events: mpsc::Receiver<Value>,
    ) -> Self {
        Self {
            channel,
            events,
            inner: Some(SubscriptionInner {
                session,
                listener_id,
                registry,
            }),
        }
    }

    pub(crate) fn inert(channel: ChannelId) -> Self {
        // Sender dropped on the spot: the stream yields None immediately.
        let (_tx, events) = mpsc::channel(1);
        Self {
            channel,
            events,
            inner: None,
        }
    }

    pub fn channel(&self) -> ChannelId {
        self.channel
    }

    /// `false` for the inert handle returned before auth completes.
    pub fn is_active(&self) -> bool {
        self.inner.is_some()
    }

    /// Whether the underlying session is open right now.
    pub fn is_connected(&self) -> bool {
        self.inner
            .as_ref()
            .is_some_and(|inner| inner.session.is_connected())
    }

    pub fn state(&self) -> SessionState {
        self.inner
            .as_ref()
            .map(|inner| inner.session.state())
            .unwrap_or(SessionState::Closed)
    }

    /// Watch the session's state transitions (connectivity badge feed).
    pub fn state_changes(&self) -> watch::Receiver<SessionState> {
        match &self.inner {
            Some(inner) => inner.session.state_changes(),
            None => watch::channel(SessionState::Closed).1,
        }
    }

    /// Next inbound application event, in wire receipt order. Returns
    /// `None` once the subscription is inert or torn down.
    pub async fn next_event(&mut self) -> Option<Value> {
        self.events.recv().await
    }

    /// Send a chat message on the shared session.
    pub async fn send(&self, payload: &ChatPayload) -> Result<()> {
        match &self.inner {
            Some(inner) => inner.session.send(payload).await,
            None => Err(TransportError::NotConnected),
        }
    }

    /// Send a typing indicator on the shared session.
    pub async fn send_typing(&self, is_typing: bool) -> Result<()> {
        match &self.inner {
            Some(inner) => inner.session.send_typing(is_typing).await,
            None => Err(TransportError::NotConnected),
        }
    }

    /// Detach the listener and return the lease. Equivalent to dropping
    /// the handle, spelled out for call sites that want it explicit.
    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(inner) = self.inner.take() {
            inner.session.detach(inner.listener_id);

            if tokio::runtime::Handle::try_current().is_ok() {
                inner.registry.release(self.channel);
            } else {
                // No runtime means no grace timer; nothing left to do but
                // flag it. Only reachable when a handle outlives the
                // runtime during process teardown.
                tracing::warn!(
                    "Channel {}: subscription dropped outside the runtime, lease not released",
                    self.channel
                );
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}
