//! Defines the JSON message protocol between the client and the RELINK backend.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Events sent from the server to the client, or synthesized locally for
/// connection lifecycle notices.
///
/// The backend attaches extra fields to some notices (system events carry an
/// `actor`); anything not listed here is ignored on decode.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum InboundEvent {
    /// An informational log line not authored by any chat participant.
    System { text: String, ts: String },
    /// A chat message attributed to an actor.
    Message {
        actor: String,
        text: String,
        ts: String,
    },
}

impl InboundEvent {
    /// A locally synthesized system notice stamped with the current time.
    pub fn system(text: impl Into<String>) -> Self {
        Self::System {
            text: text.into(),
            ts: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Events sent from the client to the server. A plain chat message is the
/// only shape the client ever sends.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutboundEvent {
    Message { text: String },
}

/// The result of decoding a raw text frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// A well-formed wire event.
    Event(InboundEvent),
    /// Anything that is not valid protocol JSON. Not an error: the raw
    /// payload degrades to a plain-text system line.
    Raw(String),
}

/// Decodes a raw frame into a tagged result instead of failing on
/// malformed payloads.
pub fn decode(raw: &str) -> Decoded {
    match serde_json::from_str::<InboundEvent>(raw) {
        Ok(event) => Decoded::Event(event),
        Err(_) => Decoded::Raw(raw.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    #[test]
    fn outbound_message_wire_format_is_exact() {
        let event = OutboundEvent::Message {
            text: "hi".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&event).unwrap(),
            r#"{"type":"message","text":"hi"}"#
        );
    }

    #[test]
    fn decodes_message_event() {
        let raw = r#"{"type":"message","actor":"Bob","text":"hello","ts":"2026-01-05T10:00:00Z"}"#;
        assert_eq!(
            decode(raw),
            Decoded::Event(InboundEvent::Message {
                actor: "Bob".to_string(),
                text: "hello".to_string(),
                ts: "2026-01-05T10:00:00Z".to_string(),
            })
        );
    }

    #[test]
    fn decodes_system_event_with_extra_fields() {
        // The backend attaches an `actor` to join/leave notices.
        let raw = r#"{"type":"system","actor":"Bob","text":"Bob joined the chat","ts":"2026-01-05T10:00:00Z"}"#;
        assert_eq!(
            decode(raw),
            Decoded::Event(InboundEvent::System {
                text: "Bob joined the chat".to_string(),
                ts: "2026-01-05T10:00:00Z".to_string(),
            })
        );
    }

    #[test]
    fn non_json_payload_degrades_to_raw() {
        assert_eq!(decode("plain text"), Decoded::Raw("plain text".to_string()));
    }

    #[test]
    fn unknown_event_type_degrades_to_raw() {
        let raw = r#"{"type":"presence","who":"Bob"}"#;
        assert_eq!(decode(raw), Decoded::Raw(raw.to_string()));
    }

    #[test]
    fn synthesized_system_event_carries_rfc3339_stamp() {
        let InboundEvent::System { text, ts } = InboundEvent::system("Connected to RELINK") else {
            panic!("expected a system event");
        };
        assert_eq!(text, "Connected to RELINK");
        assert!(DateTime::parse_from_rfc3339(&ts).is_ok());
    }
}
