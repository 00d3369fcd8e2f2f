//! Property-based tests for snapshot decoding.
//!
//! These verify the feed contract for ALL well-formed payloads, not just
//! specific examples: decoding a `session_update` envelope must yield records
//! equal in content and order to the payload, and no input - however
//! malformed - may ever panic the decoder.

use argus_proto::{RawEvent, SESSION_UPDATE, Session, decode_envelope, encode_envelope};
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use serde_json::Value;

/// Strategy for feed-plausible text fields.
fn field() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ()./:_-]{0,24}"
}

/// Strategy for a full session record.
fn arbitrary_session() -> impl Strategy<Value = Session> {
    (
        field(),
        field(),
        field(),
        field(),
        field(),
        field(),
        prop::option::of(field()),
        prop::option::of(any::<u64>()),
        prop::option::of(field()),
    )
        .prop_map(
            |(
                title,
                user,
                state,
                ip_address,
                transcode_info,
                poster_url,
                server,
                bandwidth,
                media_type,
            )| {
                Session {
                    title,
                    user,
                    state,
                    ip_address,
                    transcode_info,
                    poster_url,
                    server,
                    bandwidth,
                    media_type,
                }
            },
        )
}

/// Strategy for arbitrary (possibly nested) JSON values, to throw malformed
/// records at the decoder.
fn arbitrary_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        field().prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::hash_map(field(), inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

#[test]
fn prop_snapshot_decode_preserves_content_and_order() {
    proptest!(|(sessions in prop::collection::vec(arbitrary_session(), 0..8))| {
        let data = serde_json::to_value(&sessions).expect("sessions serialize");
        let raw = encode_envelope(SESSION_UPDATE, &data);

        let Some(RawEvent::SessionUpdate(records)) =
            decode_envelope(&raw).expect("well-formed envelope decodes")
        else {
            return Err(TestCaseError::fail("expected a session_update event"));
        };

        prop_assert_eq!(records.len(), sessions.len(), "record count mismatch");
        for (index, (record, expected)) in records.iter().zip(&sessions).enumerate() {
            let decoded = Session::from_record(index, record).expect("record decodes");
            prop_assert_eq!(&decoded, expected, "record {} diverged", index);
        }
    });
}

#[test]
fn prop_record_decode_never_panics() {
    proptest!(|(record in arbitrary_json())| {
        // Malformed records must come back as errors, never as panics.
        let _ = Session::from_record(0, &record);
    });
}

#[test]
fn prop_envelope_decode_never_panics() {
    proptest!(|(raw in ".{0,256}")| {
        let _ = decode_envelope(&raw);
    });
}
