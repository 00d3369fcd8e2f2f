//! Demo feed.
//!
//! An in-process harness server plus a driver task that cycles through the
//! sample snapshots, so the dashboard can run (and be demoed) without a
//! backend aggregator. The rotation includes an empty snapshot on purpose:
//! the "no active sessions" state is part of the dashboard's contract.

use std::time::Duration;

use argus_harness::{FeedHandle, FeedServer, HarnessError, sample};
use argus_proto::{SERVERS_UPDATED, SESSION_UPDATE};
use serde_json::Value;
use tokio::task::JoinHandle;

/// How often the demo publishes a fresh snapshot.
const DEMO_INTERVAL: Duration = Duration::from_secs(2);

/// Which sample records each stage of the rotation shows.
const ROTATION: &[&[usize]] = &[&[0, 1], &[0, 1, 2], &[1, 2, 3], &[3], &[], &[0, 1, 2, 3]];

/// In-process demo feed.
pub struct DemoFeed {
    server: FeedServer,
    driver: JoinHandle<()>,
}

impl DemoFeed {
    /// Start the feed server and the snapshot rotation.
    ///
    /// # Errors
    ///
    /// [`HarnessError`] when the in-process server cannot be started.
    pub async fn start() -> Result<Self, HarnessError> {
        let server = FeedServer::start().await?;
        let driver = tokio::spawn(drive(server.handle()));
        Ok(Self { server, driver })
    }

    /// WebSocket URL of the in-process feed.
    pub fn url(&self) -> String {
        self.server.url()
    }
}

impl Drop for DemoFeed {
    fn drop(&mut self) {
        self.driver.abort();
    }
}

/// Publish the server list, then rotate snapshots forever.
async fn drive(handle: FeedHandle) {
    let records = sample::session_records();
    let mut ticker = tokio::time::interval(DEMO_INTERVAL);
    let mut stage = 0usize;

    loop {
        ticker.tick().await;

        if stage % ROTATION.len() == 0 {
            handle.emit(SERVERS_UPDATED, &sample::server_records());
        }

        let picks = ROTATION[stage % ROTATION.len()];
        let data: Vec<Value> = picks.iter().filter_map(|&i| records.get(i).cloned()).collect();
        handle.emit(SESSION_UPDATE, &Value::Array(data));

        stage = stage.wrapping_add(1);
    }
}
