use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::client::action::{submit_step, StepOutcome, StepTarget, NETWORK_ERROR};
use crate::client::transport::ApiTransport;
use crate::workflow::registry::ONBOARDING_STEPS;
use crate::workflow::{Stage, StageController, StageCursor};

fn rejection_message(data: &Value) -> String {
    data.get("message")
        .and_then(Value::as_str)
        .unwrap_or("Request failed")
        .to_string()
}

/// Client-side onboarding wizard.
///
/// Owns the stage controller; each submission posts the current step and
/// advances only when the service accepts it. `back` is local.
pub struct OnboardingWizard<T: ApiTransport> {
    transport: T,
    session_id: Uuid,
    controller: StageController,
    error: Option<String>,
}

impl<T: ApiTransport> OnboardingWizard<T> {
    /// Opens a new onboarding session on the service.
    pub async fn start(transport: T, employee_id: &str, employee_name: &str) -> Result<Self, String> {
        let body = json!({ "employee_id": employee_id, "employee_name": employee_name });
        let data = transport
            .post_json("/api/onboarding/start", &body)
            .await
            .map_err(|_| NETWORK_ERROR.to_string())?;
        if data.get("success").and_then(Value::as_bool) != Some(true) {
            return Err(rejection_message(&data));
        }
        Self::from_session(transport, &data)
    }

    /// Attaches to an existing session at the step the service has reached.
    pub async fn resume(transport: T, session_id: Uuid) -> Result<Self, String> {
        let data = transport
            .get_json(&format!("/api/onboarding/session/{session_id}"))
            .await
            .map_err(|_| NETWORK_ERROR.to_string())?;
        if data.get("success").and_then(Value::as_bool) == Some(false) {
            return Err(rejection_message(&data));
        }
        Self::from_session(transport, &data)
    }

    fn from_session(transport: T, view: &Value) -> Result<Self, String> {
        let session_id = view
            .get("session_id")
            .and_then(Value::as_str)
            .and_then(|s| s.parse::<Uuid>().ok())
            .ok_or_else(|| "Response did not include a session id".to_string())?;
        let current_step = view
            .pointer("/current_step/id")
            .and_then(Value::as_u64)
            .and_then(|id| u32::try_from(id).ok())
            .ok_or_else(|| "Response did not include the current step".to_string())?;
        let completed_steps = view
            .get("completed_steps")
            .and_then(Value::as_array)
            .map(|ids| {
                ids.iter()
                    .filter_map(Value::as_u64)
                    .filter_map(|id| u32::try_from(id).ok())
                    .collect()
            })
            .unwrap_or_default();
        let cursor = StageCursor {
            current_step,
            completed_steps,
        };
        Ok(Self {
            transport,
            session_id,
            controller: StageController::restore(ONBOARDING_STEPS, &cursor),
            error: None,
        })
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn current_step(&self) -> Option<&'static Stage> {
        self.controller.current()
    }

    pub fn controller(&self) -> &StageController {
        &self.controller
    }

    /// Inline error from the last submission, cleared on success.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub async fn submit(&mut self, payload: Map<String, Value>) -> StepOutcome {
        let Some(stage) = self.controller.current() else {
            return StepOutcome::Rejected("No current step".to_string());
        };
        let target = StepTarget::onboarding(stage.slug, self.session_id);
        let controller = &mut self.controller;
        let outcome = submit_step(&self.transport, &target, payload, || {
            controller.next();
        })
        .await;
        self.error = outcome.message().map(str::to_string);
        outcome
    }

    pub fn back(&mut self) -> bool {
        self.controller.previous()
    }
}
