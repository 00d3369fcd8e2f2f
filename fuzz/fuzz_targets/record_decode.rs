//! Fuzz target for session record decoding
//!
//! Feeds arbitrary JSON values to `Session::from_record` to verify that
//! malformed records always come back as errors, never as panics, whatever
//! their nesting or types.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(value) = serde_json::from_str::<serde_json::Value>(text) else {
        return;
    };
    let _ = argus_proto::Session::from_record(0, &value);
});
