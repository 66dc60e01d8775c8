use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::events::{EventBus, ProcessEvent};
use crate::store::HrStore;
use crate::talent::pipeline::percentage;
use crate::workflow::registry::{find_by_slug, EXIT_STEPS};
use crate::workflow::{ProcessKind, ProcessRecord, ProcessStatus, Stage, StepStatus};

pub const RESIGNATION_STEP: &str = "resignation";
pub const APPROVAL_STEP: &str = "manager_approval";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResignationRequest {
    pub employee_id: String,
    pub employee_name: String,
    pub reason: String,
    pub last_working_day: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExitView {
    pub exit_id: Uuid,
    pub employee_id: String,
    pub employee_name: String,
    pub status: ProcessStatus,
    pub steps: BTreeMap<String, StepStatus>,
    pub data: Map<String, Value>,
    pub pending_steps: Vec<&'static Stage>,
    pub progress: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ExitView {
    pub fn from_record(record: &ProcessRecord) -> Self {
        let pending_steps: Vec<&'static Stage> = EXIT_STEPS
            .iter()
            .filter(|s| !record.steps.contains_key(s.slug))
            .collect();
        let completed = record
            .steps
            .values()
            .filter(|s| **s == StepStatus::Completed)
            .count();
        Self {
            exit_id: record.id,
            employee_id: record.subject_id.clone(),
            employee_name: record.subject_name.clone(),
            status: record.status,
            steps: record.steps.clone(),
            data: record.data.clone(),
            pending_steps,
            progress: percentage(completed, EXIT_STEPS.len()),
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Opens an exit process with the resignation step already recorded.
pub async fn submit_resignation(
    store: &dyn HrStore,
    events: &EventBus,
    req: ResignationRequest,
) -> Result<ProcessRecord, AppError> {
    if req.employee_id.trim().is_empty() {
        return Err(AppError::Validation("employee_id cannot be empty".to_string()));
    }
    if req.reason.trim().is_empty() {
        return Err(AppError::Validation("reason cannot be empty".to_string()));
    }
    let mut record = ProcessRecord::new(ProcessKind::Exit, &req.employee_id, &req.employee_name);
    let payload = serde_json::to_value(&req).map_err(anyhow::Error::from)?;
    record.record_step(RESIGNATION_STEP, StepStatus::Completed, payload)?;
    store.insert_process(&record).await?;
    info!(
        "Exit process {} initiated for employee {}",
        record.id, req.employee_id
    );
    events.publish(ProcessEvent::from_record(&record, Some(RESIGNATION_STEP)));
    Ok(record)
}

pub async fn load_exit(store: &dyn HrStore, exit_id: Uuid) -> Result<ProcessRecord, AppError> {
    store
        .get_process(exit_id)
        .await?
        .filter(|r| r.kind == ProcessKind::Exit)
        .ok_or_else(|| AppError::NotFound("Exit process not found".to_string()))
}

/// Records one follow-up exit step.
///
/// A manager approval with `approved: false` rejects the step and cancels the
/// process. The process completes once every exit step has completed.
pub async fn record_action(
    store: &dyn HrStore,
    events: &EventBus,
    exit_id: Uuid,
    action: &str,
    payload: Map<String, Value>,
) -> Result<ProcessRecord, AppError> {
    let stage = find_by_slug(EXIT_STEPS, action)
        .ok_or_else(|| AppError::NotFound(format!("Unknown exit action '{action}'")))?;
    if stage.slug == RESIGNATION_STEP {
        return Err(AppError::Conflict(
            "Resignation is submitted through /api/exit/resign".to_string(),
        ));
    }
    let mut record = load_exit(store, exit_id).await?;

    let declined = stage.slug == APPROVAL_STEP
        && payload.get("approved").and_then(Value::as_bool) == Some(false);
    let step_status = if declined {
        StepStatus::Rejected
    } else {
        StepStatus::Completed
    };
    record.record_step(stage.slug, step_status, Value::Object(payload))?;

    if declined {
        warn!("Exit process {exit_id}: resignation declined by manager");
        record.set_status(ProcessStatus::Cancelled);
    } else if record.all_completed(EXIT_STEPS.iter().map(|s| s.slug)) {
        info!("Exit process {exit_id} completed");
        record.set_status(ProcessStatus::Completed);
    } else {
        record.set_status(ProcessStatus::InProgress);
    }

    save(store, &record).await?;
    info!("Exit process {exit_id}: step '{action}' recorded");
    events.publish(ProcessEvent::from_record(&record, Some(stage.slug)));
    Ok(record)
}

/// Cancels an open exit process at the employee's request.
pub async fn withdraw(
    store: &dyn HrStore,
    events: &EventBus,
    exit_id: Uuid,
) -> Result<ProcessRecord, AppError> {
    let mut record = load_exit(store, exit_id).await?;
    if record.status.is_terminal() {
        return Err(AppError::Conflict(format!(
            "Exit process is already {}",
            record.status.as_str()
        )));
    }
    record.set_status(ProcessStatus::Cancelled);
    save(store, &record).await?;
    info!("Exit process {exit_id} withdrawn");
    events.publish(ProcessEvent::from_record(&record, None));
    Ok(record)
}

async fn save(store: &dyn HrStore, record: &ProcessRecord) -> Result<(), AppError> {
    if !store.update_process(record).await? {
        return Err(AppError::NotFound("Exit process not found".to_string()));
    }
    Ok(())
}
