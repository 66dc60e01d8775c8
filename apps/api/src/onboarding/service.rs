use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::events::{EventBus, ProcessEvent};
use crate::store::HrStore;
use crate::workflow::registry::{find_by_slug, ONBOARDING_STEPS};
use crate::workflow::{
    ProcessKind, ProcessRecord, ProcessStatus, Stage, StageController, StepStatus,
};

/// Onboarding record as returned to the wizard screens.
#[derive(Debug, Clone, Serialize)]
pub struct OnboardingView {
    pub session_id: Uuid,
    pub employee_id: String,
    pub employee_name: String,
    pub status: ProcessStatus,
    pub current_step: Option<&'static Stage>,
    pub completed_steps: Vec<u32>,
    pub total_steps: usize,
    pub progress: f64,
    pub steps: BTreeMap<String, StepStatus>,
    pub data: Map<String, Value>,
}

fn controller_for(record: &ProcessRecord) -> StageController {
    match &record.cursor {
        Some(cursor) => StageController::restore(ONBOARDING_STEPS, cursor),
        None => StageController::new(ONBOARDING_STEPS),
    }
}

impl OnboardingView {
    pub fn from_record(record: &ProcessRecord) -> Self {
        let controller = controller_for(record);
        Self {
            session_id: record.id,
            employee_id: record.subject_id.clone(),
            employee_name: record.subject_name.clone(),
            status: record.status,
            current_step: controller.current(),
            completed_steps: controller.completed().iter().copied().collect(),
            total_steps: ONBOARDING_STEPS.len(),
            progress: controller.progress_percent(),
            steps: record.steps.clone(),
            data: record.data.clone(),
        }
    }
}

pub async fn start_session(
    store: &dyn HrStore,
    events: &EventBus,
    employee_id: &str,
    employee_name: &str,
) -> Result<ProcessRecord, AppError> {
    if employee_id.trim().is_empty() {
        return Err(AppError::Validation("employee_id cannot be empty".to_string()));
    }
    let mut record = ProcessRecord::new(ProcessKind::Onboarding, employee_id, employee_name);
    record.set_cursor(StageController::new(ONBOARDING_STEPS).cursor());
    store.insert_process(&record).await?;
    info!("Onboarding session {} started for employee {employee_id}", record.id);
    events.publish(ProcessEvent::from_record(&record, None));
    Ok(record)
}

pub async fn load_session(store: &dyn HrStore, session_id: Uuid) -> Result<ProcessRecord, AppError> {
    store
        .get_process(session_id)
        .await?
        .filter(|r| r.kind == ProcessKind::Onboarding)
        .ok_or_else(|| AppError::NotFound("Onboarding session not found".to_string()))
}

/// Records a step submission.
///
/// Submitting the current step advances the cursor; resubmitting an earlier step
/// only replaces its payload. Steps ahead of the cursor are refused.
pub async fn submit_step(
    store: &dyn HrStore,
    events: &EventBus,
    session_id: Uuid,
    slug: &str,
    payload: Map<String, Value>,
) -> Result<ProcessRecord, AppError> {
    let stage = find_by_slug(ONBOARDING_STEPS, slug)
        .ok_or_else(|| AppError::NotFound(format!("Unknown onboarding step '{slug}'")))?;
    let mut record = load_session(store, session_id).await?;
    let mut controller = controller_for(&record);

    let current = controller
        .current()
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("onboarding has no steps")))?;
    if stage.id > current.id {
        return Err(AppError::Conflict(format!(
            "Complete '{}' before '{}'",
            current.title, stage.title
        )));
    }

    record.record_step(slug, StepStatus::Completed, Value::Object(payload))?;
    if stage.id == current.id {
        controller.next();
    }
    record.set_cursor(controller.cursor());

    let all_slugs = ONBOARDING_STEPS.iter().map(|s| s.slug);
    if record.all_completed(all_slugs) {
        record.set_status(ProcessStatus::Completed);
        info!("Onboarding session {session_id} completed");
    } else {
        record.set_status(ProcessStatus::InProgress);
    }

    save(store, &record).await?;
    info!("Onboarding session {session_id}: step '{slug}' recorded");
    events.publish(ProcessEvent::from_record(&record, Some(slug)));
    Ok(record)
}

/// Moves the cursor back one step. A no-op on the first step.
pub async fn step_back(
    store: &dyn HrStore,
    events: &EventBus,
    session_id: Uuid,
) -> Result<ProcessRecord, AppError> {
    let mut record = load_session(store, session_id).await?;
    if record.status.is_terminal() {
        return Err(AppError::Conflict(format!(
            "Onboarding session is already {}",
            record.status.as_str()
        )));
    }
    let mut controller = controller_for(&record);
    if controller.previous() {
        record.set_cursor(controller.cursor());
        save(store, &record).await?;
        events.publish(ProcessEvent::from_record(&record, None));
    }
    Ok(record)
}

async fn save(store: &dyn HrStore, record: &ProcessRecord) -> Result<(), AppError> {
    if !store.update_process(record).await? {
        return Err(AppError::NotFound("Onboarding session not found".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    async fn fresh() -> (MemoryStore, EventBus, Uuid) {
        let store = MemoryStore::new();
        let events = EventBus::new(64);
        let record = start_session(&store, &events, "EMP-42", "Ari Vance")
            .await
            .unwrap();
        (store, events, record.id)
    }

    #[tokio::test]
    async fn test_start_sits_on_welcome() {
        let (store, _, id) = fresh().await;
        let view = OnboardingView::from_record(&load_session(&store, id).await.unwrap());
        assert_eq!(view.current_step.unwrap().title, "Welcome");
        assert!(view.completed_steps.is_empty());
        assert_eq!(view.status, ProcessStatus::Initiated);
        assert_eq!(view.total_steps, 20);
    }

    #[tokio::test]
    async fn test_submit_current_step_advances() {
        let (store, events, id) = fresh().await;
        let mut payload = Map::new();
        payload.insert("accepted".into(), Value::Bool(true));
        let record = submit_step(&store, &events, id, "welcome", payload)
            .await
            .unwrap();
        let view = OnboardingView::from_record(&record);
        assert_eq!(view.current_step.unwrap().id, 2);
        assert_eq!(view.completed_steps, vec![1]);
        assert_eq!(view.status, ProcessStatus::InProgress);
        assert_eq!(view.data["welcome"]["accepted"], true);
    }

    #[tokio::test]
    async fn test_duplicate_submission_does_not_double_advance() {
        let (store, events, id) = fresh().await;
        submit_step(&store, &events, id, "welcome", Map::new()).await.unwrap();
        let record = submit_step(&store, &events, id, "welcome", Map::new())
            .await
            .unwrap();
        assert_eq!(record.cursor.unwrap().current_step, 2);
    }

    #[tokio::test]
    async fn test_future_step_refused() {
        let (store, events, id) = fresh().await;
        let err = submit_step(&store, &events, id, "bank-details", Map::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_unknown_step_and_session() {
        let (store, events, id) = fresh().await;
        let err = submit_step(&store, &events, id, "karaoke", Map::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        let err = submit_step(&store, &events, Uuid::new_v4(), "welcome", Map::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_full_walkthrough_completes() {
        let (store, events, id) = fresh().await;
        let mut rx = events.subscribe();
        let mut record = None;
        for stage in ONBOARDING_STEPS {
            record = Some(
                submit_step(&store, &events, id, stage.slug, Map::new())
                    .await
                    .unwrap(),
            );
        }
        let view = OnboardingView::from_record(&record.unwrap());
        assert_eq!(view.status, ProcessStatus::Completed);
        assert_eq!(view.current_step.unwrap().title, "Completion");
        assert_eq!(view.completed_steps, (1..=19).collect::<Vec<u32>>());

        let mut received = 0;
        while rx.try_recv().is_ok() {
            received += 1;
        }
        assert_eq!(received, 20);
    }

    #[tokio::test]
    async fn test_step_back() {
        let (store, events, id) = fresh().await;
        let record = step_back(&store, &events, id).await.unwrap();
        assert_eq!(record.cursor.unwrap().current_step, 1);

        submit_step(&store, &events, id, "welcome", Map::new()).await.unwrap();
        submit_step(&store, &events, id, "personal-info", Map::new()).await.unwrap();
        let record = step_back(&store, &events, id).await.unwrap();
        let cursor = record.cursor.unwrap();
        assert_eq!(cursor.current_step, 2);
        assert_eq!(cursor.completed_steps.len(), 2);
    }
}
