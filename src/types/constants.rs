use std::time::Duration;

/// Inbound frame type string for server heartbeats (magic strings layer)
pub const HEARTBEAT_TYPE: &str = "ping";

/// Outbound frame type string for typing indicators
pub const TYPING_TYPE: &str = "typing";

/// Query parameter carrying the bearer credential
pub const TOKEN_QUERY_PARAM: &str = "token";

/// WebSocket close codes treated as a clean, intentional closure
pub const CLOSE_NORMAL: u16 = 1000;
pub const CLOSE_GOING_AWAY: u16 = 1001;

/// First reconnect delay after an abnormal closure
pub const RECONNECT_BASE: Duration = Duration::from_secs(1);

/// Ceiling on the reconnect delay
pub const RECONNECT_CAP: Duration = Duration::from_secs(30);

/// How long a session with no remaining leases survives before teardown
pub const TEARDOWN_GRACE: Duration = Duration::from_millis(500);

/// Default connect/handshake timeout
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Buffer size of each subscriber's event queue
pub const EVENT_BUFFER: usize = 100;
