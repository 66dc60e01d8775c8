//! Fixed-interval refresh of a process record.
//!
//! Not an event subscription: no backpressure, no deltas, no backoff. Fetch
//! failures are logged and the next tick tries again. Polling stops when the
//! poller is dropped or retargeted at another process.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::client::transport::ApiTransport;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

pub struct ProcessPoller {
    transport: Arc<dyn ApiTransport>,
    interval: Duration,
    process_id: Uuid,
    latest: Arc<watch::Sender<Option<Value>>>,
    task: JoinHandle<()>,
}

impl ProcessPoller {
    pub fn spawn(transport: Arc<dyn ApiTransport>, process_id: Uuid, interval: Duration) -> Self {
        let latest = Arc::new(watch::channel(None).0);
        let task = spawn_loop(transport.clone(), process_id, interval, latest.clone());
        Self {
            transport,
            interval,
            process_id,
            latest,
            task,
        }
    }

    pub fn process_id(&self) -> Uuid {
        self.process_id
    }

    /// Receiver that sees every refreshed snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Option<Value>> {
        self.latest.subscribe()
    }

    pub fn latest(&self) -> Option<Value> {
        self.latest.borrow().clone()
    }

    /// Stops polling the current process and starts on `process_id`.
    /// The last snapshot is cleared. Same id is a no-op.
    pub fn retarget(&mut self, process_id: Uuid) {
        if process_id == self.process_id {
            return;
        }
        self.task.abort();
        self.latest.send_replace(None);
        self.process_id = process_id;
        self.task = spawn_loop(
            self.transport.clone(),
            process_id,
            self.interval,
            self.latest.clone(),
        );
    }
}

impl Drop for ProcessPoller {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn spawn_loop(
    transport: Arc<dyn ApiTransport>,
    process_id: Uuid,
    every: Duration,
    latest: Arc<watch::Sender<Option<Value>>>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let path = format!("/api/processes/{process_id}");
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            match transport.get_json(&path).await {
                Ok(snapshot) => {
                    debug!("Refreshed process {process_id}");
                    latest.send_replace(Some(snapshot));
                }
                Err(e) => warn!("Refreshing process {process_id} failed: {e}"),
            }
        }
    })
}
