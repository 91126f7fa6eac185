use std::sync::Arc;
use std::time::Duration;

use url::Url;

use super::RealtimeManager;
use crate::infrastructure::{NetworkStatus, TaskSlot, network};
use crate::registry::ConnectionRegistry;
use crate::types::constants::{
    CONNECT_TIMEOUT, EVENT_BUFFER, RECONNECT_BASE, RECONNECT_CAP, TEARDOWN_GRACE,
};
use crate::types::error::{Result, TransportError};

/// Tuning knobs for the transport. `Default` carries the production
/// values; tests shorten the timings.
#[derive(Debug, Clone)]
pub struct TransportOptions {
    /// First reconnect delay after an abnormal closure.
    pub reconnect_base: Duration,
    /// Ceiling on the reconnect delay.
    pub reconnect_cap: Duration,
    /// How long an unleased session survives before teardown.
    pub teardown_grace: Duration,
    /// Connect/handshake timeout.
    pub connect_timeout: Duration,
    /// Buffer size of each subscriber's event queue.
    pub event_buffer: usize,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            reconnect_base: RECONNECT_BASE,
            reconnect_cap: RECONNECT_CAP,
            teardown_grace: TEARDOWN_GRACE,
            connect_timeout: CONNECT_TIMEOUT,
            event_buffer: EVENT_BUFFER,
        }
    }
}

/// Builder for [`RealtimeManager`] that validates the endpoint and wires
/// the background connectivity watcher.
pub struct RealtimeManagerBuilder {
    endpoint: String,
    options: TransportOptions,
}

impl RealtimeManagerBuilder {
    /// Create a new builder. The endpoint is the channel-addressing base
    /// URL, e.g. `wss://collab.example/api/chat/ws`.
    pub fn new(endpoint: impl Into<String>, options: TransportOptions) -> Result<Self> {
        let endpoint = endpoint.into();

        let url = Url::parse(&endpoint)?;
        match url.scheme() {
            "ws" | "wss" => {}
            other => {
                return Err(TransportError::Connection(format!(
                    "unsupported endpoint scheme: {}",
                    other
                )));
            }
        }

        Ok(Self { endpoint, options })
    }

    /// Build the manager and spawn the network monitor task.
    pub fn build(self) -> RealtimeManager {
        let registry = ConnectionRegistry::new(self.endpoint, self.options.clone());
        let network = NetworkStatus::new();

        let monitor = Arc::new(TaskSlot::new());
        monitor.arm(network::spawn_monitor(registry.clone(), network.watch()));

        RealtimeManager {
            registry,
            network,
            options: self.options,
            _monitor: monitor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ws_and_wss_endpoints_are_accepted() {
        assert!(RealtimeManagerBuilder::new("ws://chat.local/ws", TransportOptions::default()).is_ok());
        assert!(RealtimeManagerBuilder::new("wss://chat.local/ws", TransportOptions::default()).is_ok());
    }

    #[test]
    fn test_http_endpoint_is_rejected() {
        let result = RealtimeManagerBuilder::new("https://chat.local/ws", TransportOptions::default());
        assert!(matches!(result, Err(TransportError::Connection(_))));
    }

    #[test]
    fn test_garbage_endpoint_is_rejected() {
        let result = RealtimeManagerBuilder::new("not a url", TransportOptions::default());
        assert!(matches!(result, Err(TransportError::UrlParse(_))));
    }
}
