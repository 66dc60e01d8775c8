//! In-process event channel for process records.
//!
//! Every mutation of a [`ProcessRecord`] is published here. Subscribers (the
//! server-sent events route) receive changes as they happen instead of
//! re-fetching on a fixed interval.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

use crate::workflow::{ProcessKind, ProcessRecord, ProcessStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessEvent {
    pub process_id: Uuid,
    pub kind: ProcessKind,
    pub status: ProcessStatus,
    /// Step that triggered the change, if any.
    pub step: Option<String>,
    pub at: DateTime<Utc>,
}

impl ProcessEvent {
    pub fn from_record(record: &ProcessRecord, step: Option<&str>) -> Self {
        Self {
            process_id: record.id,
            kind: record.kind,
            status: record.status,
            step: step.map(str::to_string),
            at: record.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<ProcessEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publishes to current subscribers. Having none is not an error.
    pub fn publish(&self, event: ProcessEvent) {
        let receivers = self.tx.send(event).unwrap_or(0);
        debug!("Process event delivered to {receivers} subscriber(s)");
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ProcessEvent> {
        self.tx.subscribe()
    }
}
