//! Test and demo harness for the Argus feed.
//!
//! An in-process WebSocket feed server with a push API, so integration tests
//! and demo mode can drive the client against a real socket without a
//! backend aggregator. Dependency-injected by construction: every
//! [`FeedServer`] is an owned instance on its own ephemeral port, so a test
//! run hosts any number of them independently.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod feed;
pub mod sample;

pub use feed::{FeedHandle, FeedServer, HarnessError};
