use std::sync::RwLock as StdRwLock;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;

use futures::SinkExt;
use futures::stream::{SplitSink, SplitStream, StreamExt};
use serde_json::Value;
use tokio::sync::{RwLock, mpsc, watch};
use tokio_tungstenite::tungstenite::Message;

use super::state::{ClosureKind, SessionState};
use crate::infrastructure::{Backoff, TaskSlot};
use crate::manager::TransportOptions;
use crate::messaging::Envelope;
use crate::types::error::{Result, TransportError};
use crate::types::{ChannelId, ChatPayload, TypingPayload};
use crate::websocket::factory::{self, WsStream};

type WsSink = SplitSink<WsStream, Message>;
type WsSource = SplitStream<WsStream>;

struct Listener {
    id: u64,
    tx: mpsc::Sender<Value>,
}

/// One shared transport session for one conversation channel.
///
/// Owns the physical connection: opens it, pumps inbound frames to every
/// attached listener in receipt order, and re-opens it with backoff after
/// an abnormal closure. Exclusively owned by the registry entry for its
/// channel; consumers only ever hold it through a [`Subscription`] lease.
///
/// [`Subscription`]: crate::manager::Subscription
pub struct ChannelSession {
    channel: ChannelId,
    token: String,
    endpoint: String,
    options: TransportOptions,
    backoff: Backoff,

    writer: RwLock<Option<WsSink>>,
    state_tx: watch::Sender<SessionState>,

    listeners: StdRwLock<Vec<Listener>>,
    listener_seq: AtomicU64,

    attempts: AtomicU32,
    locally_closed: AtomicBool,

    io_task: TaskSlot,
    reconnect_timer: TaskSlot,
}

impl ChannelSession {
    pub(crate) fn new(
        channel: ChannelId,
        token: String,
        endpoint: String,
        options: TransportOptions,
    ) -> Arc<Self> {
        let (state_tx, _state_rx) = watch::channel(SessionState::Closed);
        let backoff = Backoff::new(options.reconnect_base, options.reconnect_cap);

        Arc::new(Self {
            channel,
            token,
            endpoint,
            options,
            backoff,
            writer: RwLock::new(None),
            state_tx,
            listeners: StdRwLock::new(Vec::new()),
            listener_seq: AtomicU64::new(0),
            attempts: AtomicU32::new(0),
            locally_closed: AtomicBool::new(false),
            io_task: TaskSlot::new(),
            reconnect_timer: TaskSlot::new(),
        })
    }

    pub fn channel(&self) -> ChannelId {
        self.channel
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        *self.state_tx.borrow()
    }

    /// Whether the physical connection is open right now.
    pub fn is_connected(&self) -> bool {
        self.state() == SessionState::Open
    }

    /// Watch every state transition (feeds the connectivity badge).
    pub fn state_changes(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    /// Begin connecting unless already connecting or open.
    pub(crate) fn open(self: &Arc<Self>) {
        let started = self.state_tx.send_if_modified(|state| {
            if *state == SessionState::Closed {
                *state = SessionState::Connecting;
                true
            } else {
                false
            }
        });
        if !started {
            return;
        }

        tracing::info!("Channel {}: connecting", self.channel);
        let session = Arc::clone(self);
        self.io_task.arm(tokio::spawn(async move {
            session.run_connection().await;
        }));
    }

    /// Re-open a session found closed with no reconnect pending, e.g. one
    /// the server closed cleanly before a new subscriber arrived.
    pub(crate) fn ensure_open(self: &Arc<Self>) {
        if self.state() == SessionState::Closed
            && !self.reconnect_timer.is_armed()
            && !self.locally_closed.load(Ordering::SeqCst)
        {
            self.open();
        }
    }

    /// Skip any pending backoff window and reconnect immediately.
    pub(crate) fn retry_now(self: &Arc<Self>) {
        self.reconnect_timer.cancel();
        if self.state() == SessionState::Closed && !self.locally_closed.load(Ordering::SeqCst) {
            tracing::info!("Channel {}: immediate retry requested", self.channel);
            self.open();
        }
    }

    async fn run_connection(self: Arc<Self>) {
        let url = match factory::channel_url(&self.endpoint, self.channel, &self.token) {
            Ok(url) => url,
            Err(e) => {
                // A malformed endpoint cannot be retried into existence.
                tracing::error!("Channel {}: cannot build connection URL: {}", self.channel, e);
                self.state_tx.send_replace(SessionState::Closed);
                return;
            }
        };

        let stream = match factory::connect(&url, self.options.connect_timeout).await {
            Ok(stream) => stream,
            Err(e) => {
                tracing::warn!("Channel {}: connection attempt failed: {}", self.channel, e);
                self.finish_closure(ClosureKind::Abnormal).await;
                return;
            }
        };

        let (write_half, mut read_half) = stream.split();
        *self.writer.write().await = Some(write_half);
        self.attempts.store(0, Ordering::SeqCst);
        self.state_tx.send_replace(SessionState::Open);
        tracing::info!("Channel {}: connected", self.channel);

        let closure = self.read_loop(&mut read_half).await;

        *self.writer.write().await = None;
        self.finish_closure(closure).await;
    }

    async fn read_loop(&self, read_half: &mut WsSource) -> ClosureKind {
        while let Some(next) = read_half.next().await {
            match next {
                Ok(Message::Text(text)) => self.dispatch(text.as_str()),
                Ok(Message::Close(frame)) => {
                    let closure = ClosureKind::from_close_frame(frame.as_ref());
                    match frame {
                        Some(frame) => tracing::info!(
                            "Channel {}: server closed connection: code={}, reason='{}'",
                            self.channel,
                            u16::from(frame.code),
                            frame.reason
                        ),
                        None => tracing::warn!(
                            "Channel {}: server closed connection without close frame",
                            self.channel
                        ),
                    }
                    return closure;
                }
                Ok(Message::Ping(data)) => {
                    tracing::debug!("Received ping ({} bytes)", data.len());
                }
                Ok(Message::Pong(data)) => {
                    tracing::debug!("Received pong ({} bytes)", data.len());
                }
                Ok(Message::Binary(data)) => {
                    tracing::warn!("Received unexpected binary message ({} bytes)", data.len());
                }
                Ok(Message::Frame(_)) => {
                    tracing::debug!("Received raw frame (internal)");
                }
                Err(e) => {
                    tracing::error!("Channel {}: WebSocket read error: {}", self.channel, e);
                    return ClosureKind::Abnormal;
                }
            }
        }

        // Stream ended without a close frame: a dropped connection.
        ClosureKind::Abnormal
    }

    fn dispatch(&self, raw: &str) {
        match Envelope::parse(raw) {
            Ok(Envelope::Heartbeat) => {
                tracing::debug!("Channel {}: heartbeat", self.channel);
            }
            Ok(Envelope::Event(event)) => self.fan_out(event),
            Err(e) => {
                tracing::warn!("Channel {}: dropping malformed frame: {}", self.channel, e);
            }
        }
    }

    fn fan_out(&self, event: Value) {
        let listeners = self.listeners.read().unwrap();
        for listener in listeners.iter() {
            if let Err(e) = listener.tx.try_send(event.clone()) {
                tracing::warn!(
                    "Channel {}: listener {} not keeping up, dropping event: {}",
                    self.channel,
                    listener.id,
                    e
                );
            }
        }
    }

    async fn finish_closure(self: &Arc<Self>, closure: ClosureKind) {
        self.state_tx.send_replace(SessionState::Closed);

        if self.locally_closed.load(Ordering::SeqCst) {
            tracing::debug!("Channel {}: closed locally, not reconnecting", self.channel);
            return;
        }
        if !closure.is_abnormal() {
            tracing::info!("Channel {}: clean closure, not reconnecting", self.channel);
            return;
        }
        if self.listener_count() == 0 {
            tracing::debug!("Channel {}: no listeners remain, not reconnecting", self.channel);
            return;
        }

        self.schedule_reconnect();
    }

    fn schedule_reconnect(self: &Arc<Self>) {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        let delay = self.backoff.delay(attempt);
        tracing::info!(
            "Channel {}: reconnecting in {:?} (attempt {})",
            self.channel,
            delay,
            attempt + 1
        );

        let session = Arc::clone(self);
        self.reconnect_timer.arm(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if !session.locally_closed.load(Ordering::SeqCst) {
                session.open();
            }
        }));
    }

    /// Send a chat message. Valid only while open: outbound traffic is
    /// never buffered across reconnects.
    pub async fn send(&self, payload: &ChatPayload) -> Result<()> {
        self.send_frame(serde_json::to_string(payload)?).await
    }

    /// Send a typing indicator. Same validity rule as [`send`](Self::send),
    /// at-most-once.
    pub async fn send_typing(&self, is_typing: bool) -> Result<()> {
        self.send_frame(serde_json::to_string(&TypingPayload::new(is_typing))?)
            .await
    }

    async fn send_frame(&self, json: String) -> Result<()> {
        if self.state() != SessionState::Open {
            tracing::warn!("Channel {}: send while not connected, frame dropped", self.channel);
            return Err(TransportError::NotConnected);
        }

        let mut writer = self.writer.write().await;
        match writer.as_mut() {
            Some(ws) => {
                ws.send(Message::Text(json.into())).await?;
                Ok(())
            }
            None => {
                tracing::warn!("Channel {}: writer already gone, frame dropped", self.channel);
                Err(TransportError::NotConnected)
            }
        }
    }

    /// Attach a listener; inbound events are delivered in receipt order.
    pub(crate) fn attach(&self, tx: mpsc::Sender<Value>) -> u64 {
        let id = self.listener_seq.fetch_add(1, Ordering::Relaxed) + 1;
        self.listeners.write().unwrap().push(Listener { id, tx });
        id
    }

    pub(crate) fn detach(&self, id: u64) {
        self.listeners.write().unwrap().retain(|listener| listener.id != id);
    }

    pub(crate) fn listener_count(&self) -> usize {
        self.listeners.read().unwrap().len()
    }

    /// Locally-initiated teardown. Never schedules a reconnect.
    pub(crate) async fn close(&self) {
        self.locally_closed.store(true, Ordering::SeqCst);
        self.reconnect_timer.cancel();

        let mut writer = self.writer.write().await;
        if let Some(ws) = writer.as_mut() {
            if let Err(e) = ws.close().await {
                tracing::debug!("Channel {}: error during close handshake: {}", self.channel, e);
            }
        }
        *writer = None;
        drop(writer);

        self.io_task.cancel();
        self.state_tx.send_replace(SessionState::Closed);
        tracing::info!("Channel {}: closed", self.channel);
    }
}
