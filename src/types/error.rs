use thiserror::Error;

/// Errors surfaced by the realtime transport.
#[derive(Error, Debug)]
pub enum TransportError {
    /// WebSocket protocol error (handshake failed, invalid frame, etc.)
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    /// General connection error with descriptive message
    #[error("Connection error: {0}")]
    Connection(String),

    /// A channel lease was requested without a bearer credential
    #[error("Missing credential")]
    MissingCredential,

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing error (malformed endpoint URL)
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Connection attempt did not complete within the configured timeout
    #[error("Timeout error")]
    Timeout,

    /// Attempted to send while the channel session is not open
    #[error("Not connected")]
    NotConnected,
}

/// Convenience type alias for `Result<T, TransportError>`.
pub type Result<T> = std::result::Result<T, TransportError>;
