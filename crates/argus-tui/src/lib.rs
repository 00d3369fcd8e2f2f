//! Terminal dashboard for Argus.
//!
//! The rendering layer of the system: it consumes the read-only snapshot and
//! change notifications of [`argus_client`] and draws session cards in the
//! terminal. All synchronization logic lives in `argus-client`; this crate
//! only handles terminal I/O, UI state, and drawing.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod app;
pub mod demo;
pub mod runtime;
pub mod ui;

pub use app::{App, AppAction, AppEvent, ConnectionState};
pub use runtime::{Runtime, RuntimeError};
