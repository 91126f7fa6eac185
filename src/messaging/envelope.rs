use serde_json::Value;

use crate::types::constants::HEARTBEAT_TYPE;
use crate::types::error::Result;

/// One inbound frame, classified before fan-out.
///
/// The server interleaves liveness pings with application events on the
/// same connection. Pings carry no application meaning and are dropped at
/// this layer; every other object is forwarded verbatim for the messaging
/// domain to interpret (`new_message`, `typing`, `presence`, ...).
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    /// `{"type": "ping"}` — liveness only, never reaches listeners
    Heartbeat,
    /// Any other frame, delivered as-is
    Event(Value),
}

impl Envelope {
    /// Parse a raw text frame. A malformed frame is an error for the caller
    /// to log and drop; it never terminates the session.
    pub fn parse(raw: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(raw)?;

        if value.get("type").and_then(Value::as_str) == Some(HEARTBEAT_TYPE) {
            Ok(Self::Heartbeat)
        } else {
            Ok(Self::Event(value))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heartbeat_is_intercepted() {
        assert_eq!(Envelope::parse(r#"{"type":"ping"}"#).unwrap(), Envelope::Heartbeat);
    }

    #[test]
    fn test_heartbeat_with_extra_fields_is_still_intercepted() {
        let parsed = Envelope::parse(r#"{"type":"ping","ts":1712345678}"#).unwrap();
        assert_eq!(parsed, Envelope::Heartbeat);
    }

    #[test]
    fn test_application_event_is_forwarded_verbatim() {
        let parsed = Envelope::parse(r#"{"type":"new_message","id":7,"content":"hi"}"#).unwrap();

        let Envelope::Event(value) = parsed else {
            panic!("expected an event");
        };
        assert_eq!(value["type"], "new_message");
        assert_eq!(value["id"], 7);
    }

    #[test]
    fn test_untyped_frame_is_forwarded() {
        // Frames without a "type" discriminant are the domain's problem,
        // not the transport's.
        let parsed = Envelope::parse(r#"{"online_count":3}"#).unwrap();
        assert!(matches!(parsed, Envelope::Event(_)));
    }

    #[test]
    fn test_malformed_frame_is_an_error() {
        assert!(Envelope::parse("not json").is_err());
        assert!(Envelope::parse(r#"{"type":"#).is_err());
    }
}
