//! Wire contract for the Argus session feed.
//!
//! The aggregator pushes JSON envelopes over a persistent event channel:
//! `{"event": <name>, "data": <payload>}`. This crate defines the session
//! record types and the envelope decoding, with every wire-to-domain field
//! name mapping done here at the decode boundary. No I/O.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod errors;

mod envelope;
mod session;

pub use envelope::{
    EventKind, RawEvent, SERVERS_UPDATED, SESSION_UPDATE, decode_envelope, encode_envelope,
};
pub use errors::DecodeError;
pub use session::{Session, SessionSnapshot};
