//! Canned feed data for demo mode and tests.
//!
//! A plausible busy evening: a couple of direct plays and a transcode
//! spread over two backend servers.

use serde_json::{Value, json};

/// Wire records for the sample sessions, in feed order.
pub fn session_records() -> Vec<Value> {
    vec![
        json!({
            "title": "The Long Voyage",
            "user": "alice",
            "state": "playing",
            "ip_address": "10.0.0.5",
            "transcode": "Direct Play",
            "poster": "http://10.0.0.2:32400/photo/:/transcode?width=200&url=%2Flibrary%2Fmetadata%2F101%2Fthumb",
            "server": "atlas",
            "bandwidth": 8400,
            "type": "movie",
        }),
        json!({
            "title": "Harbor Lights - S02E04",
            "user": "bob",
            "state": "paused",
            "ip_address": "10.0.0.6",
            "transcode": "Transcode (1080p)",
            "poster": "http://10.0.0.2:32400/photo/:/transcode?width=200&url=%2Flibrary%2Fmetadata%2F233%2Fthumb",
            "server": "atlas",
            "bandwidth": 4100,
            "type": "episode",
        }),
        json!({
            "title": "Northern Trails",
            "user": "carol",
            "state": "playing",
            "ip_address": "192.168.4.17",
            "transcode": "Transcode (720p)",
            "poster": "http://10.0.0.3:32400/photo/:/transcode?width=200&url=%2Flibrary%2Fmetadata%2F87%2Fthumb",
            "server": "borealis",
            "bandwidth": 2300,
            "type": "movie",
        }),
        json!({
            "title": "Quiet Rooms",
            "user": "dave",
            "state": "buffering",
            "ip_address": "192.168.4.30",
            "transcode": "Direct Play",
            "poster": "http://10.0.0.3:32400/photo/:/transcode?width=200&url=%2Flibrary%2Fmetadata%2F412%2Fthumb",
            "server": "borealis",
            "bandwidth": 12800,
            "type": "movie",
        }),
    ]
}

/// Server-list payload matching the records above.
pub fn server_records() -> Value {
    json!([
        { "name": "atlas", "url": "http://10.0.0.2:32400/" },
        { "name": "borealis", "url": "http://10.0.0.3:32400/" },
    ])
}
