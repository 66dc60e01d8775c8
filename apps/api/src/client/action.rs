//! Per-step action handler: post the step's form, advance on success.
//!
//! No retry, timeout or idempotency key. Double submission is possible.

use serde_json::{Map, Value};
use tracing::warn;
use uuid::Uuid;

use crate::client::transport::ApiTransport;

pub const NETWORK_ERROR: &str = "Network error";

/// Where a step submission goes and which id field identifies the process.
#[derive(Debug, Clone, PartialEq)]
pub struct StepTarget {
    pub path: String,
    pub id_field: &'static str,
    pub id: Uuid,
}

impl StepTarget {
    pub fn onboarding(step_slug: &str, session_id: Uuid) -> Self {
        Self {
            path: format!("/api/onboarding/{step_slug}"),
            id_field: "session_id",
            id: session_id,
        }
    }

    pub fn exit(action: &str, exit_id: Uuid) -> Self {
        Self {
            path: format!("/api/exit/{action}"),
            id_field: "exit_id",
            id: exit_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// `success: true`; carries the response body.
    Advanced(Value),
    /// `success: false`; carries the server's message.
    Rejected(String),
    NetworkError,
}

impl StepOutcome {
    /// Inline error text for the step screen, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            StepOutcome::Advanced(_) => None,
            StepOutcome::Rejected(msg) => Some(msg),
            StepOutcome::NetworkError => Some(NETWORK_ERROR),
        }
    }

    pub fn is_advanced(&self) -> bool {
        matches!(self, StepOutcome::Advanced(_))
    }
}

/// Fields that would keep the submit button disabled: absent, null or blank.
pub fn missing_required<'a>(payload: &Map<String, Value>, required: &[&'a str]) -> Vec<&'a str> {
    required
        .iter()
        .copied()
        .filter(|field| match payload.get(*field) {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.trim().is_empty(),
            Some(_) => false,
        })
        .collect()
}

/// Posts `{ <id_field>: id, ...payload }` to the target and calls `on_next`
/// exactly once if the service answers `success: true`.
pub async fn submit_step<T, F>(
    transport: &T,
    target: &StepTarget,
    mut payload: Map<String, Value>,
    on_next: F,
) -> StepOutcome
where
    T: ApiTransport + ?Sized,
    F: FnOnce(),
{
    payload.insert(target.id_field.to_string(), Value::String(target.id.to_string()));
    let body = Value::Object(payload);

    let data = match transport.post_json(&target.path, &body).await {
        Ok(data) => data,
        Err(e) => {
            warn!("POST {} failed: {e}", target.path);
            return StepOutcome::NetworkError;
        }
    };

    if data.get("success").and_then(Value::as_bool) == Some(true) {
        on_next();
        return StepOutcome::Advanced(data);
    }

    let message = data
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("Request failed")
        .to_string();
    StepOutcome::Rejected(message)
}
