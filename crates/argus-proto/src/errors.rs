//! Decode errors for inbound feed events.

use thiserror::Error;

/// Failure to decode an inbound event payload.
///
/// Always recoverable: the offending event (or record) is dropped and the
/// channel keeps delivering subsequent events. The variants mirror the
/// malformed shapes the feed has been observed to produce, so diagnostics
/// name the exact step that failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Frame was not valid JSON.
    #[error("event frame is not valid JSON: {0}")]
    Json(String),

    /// Envelope has no string `event` field.
    #[error("event envelope is missing a string `event` field")]
    MissingEventName,

    /// Envelope has no `data` field.
    #[error("`{0}` envelope is missing its `data` field")]
    MissingData(String),

    /// `session_update` carried a non-sequence `data` payload.
    #[error("`session_update` data is not a sequence")]
    NotASequence,

    /// A single session record does not have the session shape.
    #[error("session record {index} is malformed: {reason}")]
    BadRecord {
        /// Position of the record in the snapshot payload.
        index: usize,
        /// Deserializer error text.
        reason: String,
    },
}
