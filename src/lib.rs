//! # collab-realtime
//!
//! The shared WebSocket transport behind every chat surface of the
//! collaboration suite. One physical connection per conversation channel,
//! leased out to any number of independent subscribers; automatic
//! reconnection with exponential backoff; ordered delivery of the inbound
//! event stream with server heartbeats filtered out.
//!
//! The [`RealtimeManager`] is the single entry point: it deduplicates
//! sessions per channel so two sidebars, a message list, and a typing
//! indicator all ride the same socket, and it keeps an unleased session
//! alive for a short grace window so remount churn never causes a
//! reconnect.
//!
//! ## Example
//!
//! ```no_run
//! use collab_realtime::{ChannelId, ChatPayload, RealtimeManager, TransportOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let manager = RealtimeManager::new(
//!         "wss://collab.example/api/chat/ws",
//!         TransportOptions::default(),
//!     )?;
//!
//!     let mut subscription = manager.subscribe(ChannelId(42), "bearer-token");
//!
//!     subscription.send(&ChatPayload::new("hello, channel 42")).await?;
//!
//!     while let Some(event) = subscription.next_event().await {
//!         println!("{}", event);
//!     }
//!     Ok(())
//! }
//! ```

pub mod infrastructure;
pub mod manager;
pub mod messaging;
pub mod registry;
pub mod session;
pub mod types;
pub(crate) mod websocket;

pub use infrastructure::{Backoff, NetworkStatus};
pub use manager::{RealtimeManager, RealtimeManagerBuilder, Subscription, TransportOptions};
pub use messaging::Envelope;
pub use registry::ConnectionRegistry;
pub use session::{ChannelSession, SessionState};
pub use types::{ChannelId, ChatPayload, Result, TransportError, TypingPayload};
