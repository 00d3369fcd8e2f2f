//! Fuzz target for envelope decoding
//!
//! Throws arbitrary byte sequences at `decode_envelope` to find:
//! - Parser crashes or panics
//! - Shapes that bypass the stepwise validation
//!
//! The decoder should NEVER panic. All invalid inputs must return an error
//! (or `Ok(None)` for unknown event names).

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Frames arrive as WebSocket text, so only valid UTF-8 reaches the
    // decoder in production; anything else is rejected here up front.
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = argus_proto::decode_envelope(text);
    }
});
