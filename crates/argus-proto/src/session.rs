//! Session records and snapshots.

use serde::{Deserialize, Serialize};

use crate::errors::DecodeError;

/// One active media-playback session as reported by the aggregator.
///
/// Value type: a fresh set of records arrives with every update, so a session
/// is never mutated in place. The serde attributes below are the single place
/// where wire field names (`transcode`, `poster`, `type`) are mapped to ours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Display name of the media item.
    pub title: String,

    /// Account currently playing it.
    pub user: String,

    /// Playback state label (`playing`, `paused`, `buffering`, ...).
    ///
    /// Opaque to this crate: rendered as-is, never interpreted.
    pub state: String,

    /// Originating client address.
    pub ip_address: String,

    /// Human-readable transcode / direct-play description.
    #[serde(rename = "transcode")]
    pub transcode_info: String,

    /// Poster image URL. Passed through to the rendering layer, never
    /// fetched here.
    #[serde(rename = "poster")]
    pub poster_url: String,

    /// Name of the backend server hosting the session. Not every aggregator
    /// version emits it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,

    /// Session bandwidth in kbps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bandwidth: Option<u64>,

    /// Media kind (`movie`, `episode`, ...).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
}

impl Session {
    /// Decode a single wire record.
    ///
    /// # Errors
    ///
    /// [`DecodeError::BadRecord`] when the value does not have the session
    /// shape; `index` only feeds the diagnostic.
    pub fn from_record(index: usize, record: &serde_json::Value) -> Result<Self, DecodeError> {
        serde_json::from_value(record.clone())
            .map_err(|e| DecodeError::BadRecord { index, reason: e.to_string() })
    }
}

/// Ordered set of all currently-active sessions at one point in time.
///
/// Always replaced wholesale: the feed has no incremental diff semantics, so
/// there is no merging. Feed order is preserved for rendering and no
/// uniqueness constraint is enforced (duplicate records stay, in order).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    sessions: Vec<Session>,
}

impl SessionSnapshot {
    /// Empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of active sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// True when no sessions are active.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Sessions in feed order.
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    /// Iterate sessions in feed order.
    pub fn iter(&self) -> std::slice::Iter<'_, Session> {
        self.sessions.iter()
    }
}

impl From<Vec<Session>> for SessionSnapshot {
    fn from(sessions: Vec<Session>) -> Self {
        Self { sessions }
    }
}

impl<'a> IntoIterator for &'a SessionSnapshot {
    type Item = &'a Session;
    type IntoIter = std::slice::Iter<'a, Session>;

    fn into_iter(self) -> Self::IntoIter {
        self.sessions.iter()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn wire_names_map_to_domain_fields() {
        let record = json!({
            "title": "Movie A",
            "user": "alice",
            "state": "playing",
            "ip_address": "10.0.0.5",
            "transcode": "Direct Play",
            "poster": "http://img/1",
            "server": "node-1",
            "bandwidth": 4200,
            "type": "movie",
        });

        let session = Session::from_record(0, &record).unwrap();
        assert_eq!(session.transcode_info, "Direct Play");
        assert_eq!(session.poster_url, "http://img/1");
        assert_eq!(session.media_type.as_deref(), Some("movie"));
        assert_eq!(session.bandwidth, Some(4200));
    }

    #[test]
    fn supplemental_fields_are_optional() {
        let record = json!({
            "title": "Movie B",
            "user": "bob",
            "state": "paused",
            "ip_address": "10.0.0.6",
            "transcode": "Transcode (1080p)",
            "poster": "http://img/2",
        });

        let session = Session::from_record(0, &record).unwrap();
        assert_eq!(session.server, None);
        assert_eq!(session.bandwidth, None);
        assert_eq!(session.media_type, None);
    }

    #[test]
    fn missing_core_field_is_a_bad_record() {
        let record = json!({ "title": "Movie C", "user": "carol" });

        let err = Session::from_record(3, &record).unwrap_err();
        assert!(matches!(err, DecodeError::BadRecord { index: 3, .. }));
    }

    #[test]
    fn snapshot_preserves_feed_order_and_duplicates() {
        let a = Session {
            title: "Movie A".into(),
            user: "alice".into(),
            state: "playing".into(),
            ip_address: "10.0.0.5".into(),
            transcode_info: "Direct Play".into(),
            poster_url: "url1".into(),
            server: None,
            bandwidth: None,
            media_type: None,
        };
        let snapshot = SessionSnapshot::from(vec![a.clone(), a.clone()]);

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.sessions(), &[a.clone(), a]);
    }
}
