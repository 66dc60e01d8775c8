use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::workflow::controller::StageCursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessKind {
    Onboarding,
    Exit,
}

impl ProcessKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessKind::Onboarding => "onboarding",
            ProcessKind::Exit => "exit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessStatus {
    Initiated,
    InProgress,
    Completed,
    Cancelled,
}

impl ProcessStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProcessStatus::Completed | ProcessStatus::Cancelled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessStatus::Initiated => "initiated",
            ProcessStatus::InProgress => "in_progress",
            ProcessStatus::Completed => "completed",
            ProcessStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Completed,
    Rejected,
}

#[derive(Debug, Error, PartialEq)]
pub enum ProcessError {
    #[error("process {id} is already {status}")]
    Closed { id: Uuid, status: &'static str },
}

/// Server-tracked status object for one workflow instance.
///
/// `steps` only grows: keys are inserted or overwritten, never removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessRecord {
    pub id: Uuid,
    pub kind: ProcessKind,
    pub subject_id: String,
    pub subject_name: String,
    pub status: ProcessStatus,
    pub steps: BTreeMap<String, StepStatus>,
    /// Last payload submitted for each step, keyed like `steps`.
    pub data: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<StageCursor>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProcessRecord {
    pub fn new(kind: ProcessKind, subject_id: &str, subject_name: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            kind,
            subject_id: subject_id.to_string(),
            subject_name: subject_name.to_string(),
            status: ProcessStatus::Initiated,
            steps: BTreeMap::new(),
            data: Map::new(),
            cursor: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Records the outcome and payload of a step. Terminal records are closed.
    pub fn record_step(
        &mut self,
        step: &str,
        status: StepStatus,
        payload: Value,
    ) -> Result<(), ProcessError> {
        if self.status.is_terminal() {
            return Err(ProcessError::Closed {
                id: self.id,
                status: self.status.as_str(),
            });
        }
        self.steps.insert(step.to_string(), status);
        self.data.insert(step.to_string(), payload);
        self.touch();
        Ok(())
    }

    pub fn set_status(&mut self, status: ProcessStatus) {
        if self.status != status {
            self.status = status;
            self.touch();
        }
    }

    pub fn set_cursor(&mut self, cursor: StageCursor) {
        self.cursor = Some(cursor);
        self.touch();
    }

    pub fn step_status(&self, step: &str) -> Option<StepStatus> {
        self.steps.get(step).copied()
    }

    /// True when every slug in `required` has been recorded as completed.
    pub fn all_completed<'a>(&self, required: impl IntoIterator<Item = &'a str>) -> bool {
        required
            .into_iter()
            .all(|slug| self.step_status(slug) == Some(StepStatus::Completed))
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_record_is_initiated_and_empty() {
        let r = ProcessRecord::new(ProcessKind::Exit, "E-100", "Dana Reyes");
        assert_eq!(r.status, ProcessStatus::Initiated);
        assert!(r.steps.is_empty());
        assert!(r.cursor.is_none());
    }

    #[test]
    fn test_record_step_only_grows() {
        let mut r = ProcessRecord::new(ProcessKind::Exit, "E-100", "Dana Reyes");
        r.record_step("resignation", StepStatus::Completed, json!({"reason": "move"}))
            .unwrap();
        r.record_step("asset_return", StepStatus::Completed, json!({}))
            .unwrap();
        r.record_step("resignation", StepStatus::Completed, json!({"reason": "relocation"}))
            .unwrap();
        assert_eq!(r.steps.len(), 2);
        assert_eq!(r.data["resignation"]["reason"], "relocation");
    }

    #[test]
    fn test_terminal_record_rejects_steps() {
        let mut r = ProcessRecord::new(ProcessKind::Onboarding, "E-7", "Sam Ito");
        r.set_status(ProcessStatus::Cancelled);
        let err = r
            .record_step("welcome", StepStatus::Completed, json!({}))
            .unwrap_err();
        assert_eq!(
            err,
            ProcessError::Closed {
                id: r.id,
                status: "cancelled"
            }
        );
        assert!(r.steps.is_empty());
    }

    #[test]
    fn test_all_completed_ignores_rejected() {
        let mut r = ProcessRecord::new(ProcessKind::Exit, "E-1", "A");
        r.record_step("a", StepStatus::Completed, json!({})).unwrap();
        r.record_step("b", StepStatus::Rejected, json!({})).unwrap();
        assert!(r.all_completed(["a"]));
        assert!(!r.all_completed(["a", "b"]));
        assert!(!r.all_completed(["a", "c"]));
    }

    #[test]
    fn test_status_serialises_snake_case() {
        let v = serde_json::to_value(ProcessStatus::InProgress).unwrap();
        assert_eq!(v, json!("in_progress"));
    }
}
