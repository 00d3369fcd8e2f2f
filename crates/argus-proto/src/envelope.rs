//! Inbound event envelopes.
//!
//! Every frame on the channel is a JSON object `{"event": ..., "data": ...}`.
//! Decoding is done stepwise rather than through one serde derive so that
//! each malformed shape maps to its own [`DecodeError`] variant and frames
//! with unknown event names can be skipped without raising an error.

use std::fmt;

use serde_json::Value;

use crate::errors::DecodeError;

/// Wire name of the session snapshot event.
pub const SESSION_UPDATE: &str = "session_update";

/// Wire name of the server-list event.
///
/// The `plex_` prefix is a legacy of the aggregator's first deployment
/// target; it stays on the wire for compatibility.
pub const SERVERS_UPDATED: &str = "plex_servers_updated";

/// Kind of a decoded inbound event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Full session snapshot replacement.
    SessionUpdate,
    /// Server-list metadata changed.
    ServersUpdated,
}

impl EventKind {
    /// Map a wire event name to a kind. `None` for unknown names.
    pub fn from_wire(name: &str) -> Option<Self> {
        match name {
            SESSION_UPDATE => Some(Self::SessionUpdate),
            SERVERS_UPDATED => Some(Self::ServersUpdated),
            _ => None,
        }
    }

    /// Wire event name for this kind.
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::SessionUpdate => SESSION_UPDATE,
            Self::ServersUpdated => SERVERS_UPDATED,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// A decoded inbound event.
///
/// Shape-checked only: snapshot records are kept as raw values so the
/// consumer decides the per-record filtering policy, and the server-list
/// payload is passed through uninterpreted.
#[derive(Debug, Clone, PartialEq)]
pub enum RawEvent {
    /// `session_update`: the ordered raw records of the new snapshot.
    SessionUpdate(Vec<Value>),
    /// `plex_servers_updated`: opaque server-list metadata.
    ServersUpdated(Value),
}

impl RawEvent {
    /// Kind of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::SessionUpdate(_) => EventKind::SessionUpdate,
            Self::ServersUpdated(_) => EventKind::ServersUpdated,
        }
    }
}

/// Decode one raw text frame into an event.
///
/// Returns `Ok(None)` for event names this client does not know; callers
/// ignore those rather than treating them as malformed.
///
/// # Errors
///
/// [`DecodeError`] when the frame is not an envelope or the payload shape is
/// wrong for the named event.
pub fn decode_envelope(raw: &str) -> Result<Option<RawEvent>, DecodeError> {
    let value: Value = serde_json::from_str(raw).map_err(|e| DecodeError::Json(e.to_string()))?;

    let Some(name) = value.get("event").and_then(Value::as_str) else {
        return Err(DecodeError::MissingEventName);
    };
    let Some(kind) = EventKind::from_wire(name) else {
        return Ok(None);
    };

    let Some(data) = value.get("data") else {
        return Err(DecodeError::MissingData(name.to_owned()));
    };

    match kind {
        EventKind::SessionUpdate => match data {
            Value::Array(records) => Ok(Some(RawEvent::SessionUpdate(records.clone()))),
            _ => Err(DecodeError::NotASequence),
        },
        EventKind::ServersUpdated => Ok(Some(RawEvent::ServersUpdated(data.clone()))),
    }
}

/// Encode an envelope frame.
///
/// Only feed producers (the real aggregator, the test harness) build frames;
/// the client consumes them.
pub fn encode_envelope(event: &str, data: &Value) -> String {
    serde_json::json!({ "event": event, "data": data }).to_string()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_session_update() {
        let raw = encode_envelope(SESSION_UPDATE, &json!([{"title": "Movie A"}]));

        let event = decode_envelope(&raw).unwrap().unwrap();
        assert_eq!(event.kind(), EventKind::SessionUpdate);
        assert_eq!(event, RawEvent::SessionUpdate(vec![json!({"title": "Movie A"})]));
    }

    #[test]
    fn decodes_servers_updated_opaquely() {
        let payload = json!({"nodes": [{"name": "node-1"}], "revision": 7});
        let raw = encode_envelope(SERVERS_UPDATED, &payload);

        let event = decode_envelope(&raw).unwrap().unwrap();
        assert_eq!(event, RawEvent::ServersUpdated(payload));
    }

    #[test]
    fn unknown_event_name_is_skipped_not_an_error() {
        let raw = encode_envelope("heartbeat", &json!(1));

        assert_eq!(decode_envelope(&raw).unwrap(), None);
    }

    #[test]
    fn non_json_frame_is_a_json_error() {
        assert!(matches!(decode_envelope("{oops"), Err(DecodeError::Json(_))));
    }

    #[test]
    fn envelope_without_event_name_is_rejected() {
        let raw = json!({"data": []}).to_string();

        assert_eq!(decode_envelope(&raw), Err(DecodeError::MissingEventName));
    }

    #[test]
    fn session_update_without_data_is_rejected() {
        let raw = json!({"event": SESSION_UPDATE}).to_string();

        assert_eq!(
            decode_envelope(&raw),
            Err(DecodeError::MissingData(SESSION_UPDATE.to_owned()))
        );
    }

    #[test]
    fn session_update_with_non_sequence_data_is_rejected() {
        let raw = json!({"event": SESSION_UPDATE, "data": {"title": "x"}}).to_string();

        assert_eq!(decode_envelope(&raw), Err(DecodeError::NotASequence));
    }

    #[test]
    fn empty_snapshot_decodes_to_empty_record_list() {
        let raw = encode_envelope(SESSION_UPDATE, &json!([]));

        assert_eq!(decode_envelope(&raw).unwrap(), Some(RawEvent::SessionUpdate(Vec::new())));
    }
}
