use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::errors::AppError;
use crate::onboarding::service::{self, OnboardingView};
use crate::routes::{ack, Ack, AppJson};
use crate::state::AppState;
use crate::workflow::registry::ONBOARDING_STEPS;
use crate::workflow::{ProcessKind, Stage};

#[derive(Debug, Deserialize)]
pub struct StartOnboardingRequest {
    pub employee_id: String,
    pub employee_name: String,
}

/// Body of every step screen: the session id plus the step's form fields.
#[derive(Debug, Deserialize)]
pub struct StepSubmission {
    pub session_id: Uuid,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

/// GET /api/onboarding/steps
pub async fn handle_list_steps() -> Json<&'static [Stage]> {
    Json(ONBOARDING_STEPS)
}

/// POST /api/onboarding/start
pub async fn handle_start(
    State(state): State<AppState>,
    AppJson(req): AppJson<StartOnboardingRequest>,
) -> Result<Json<Ack<OnboardingView>>, AppError> {
    let record = service::start_session(
        state.store.as_ref(),
        &state.events,
        &req.employee_id,
        &req.employee_name,
    )
    .await?;
    Ok(ack(OnboardingView::from_record(&record)))
}

/// GET /api/onboarding/sessions
pub async fn handle_list_sessions(
    State(state): State<AppState>,
) -> Result<Json<Vec<OnboardingView>>, AppError> {
    let records = state.store.list_processes(ProcessKind::Onboarding).await?;
    Ok(Json(records.iter().map(OnboardingView::from_record).collect()))
}

/// GET /api/onboarding/session/:session_id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<OnboardingView>, AppError> {
    let record = service::load_session(state.store.as_ref(), session_id).await?;
    Ok(Json(OnboardingView::from_record(&record)))
}

/// POST /api/onboarding/:step
pub async fn handle_submit_step(
    State(state): State<AppState>,
    Path(step): Path<String>,
    AppJson(req): AppJson<StepSubmission>,
) -> Result<Json<Ack<OnboardingView>>, AppError> {
    let record = service::submit_step(
        state.store.as_ref(),
        &state.events,
        req.session_id,
        &step,
        req.payload,
    )
    .await?;
    Ok(ack(OnboardingView::from_record(&record)))
}

/// POST /api/onboarding/session/:session_id/back
pub async fn handle_step_back(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Ack<OnboardingView>>, AppError> {
    let record = service::step_back(state.store.as_ref(), &state.events, session_id).await?;
    Ok(ack(OnboardingView::from_record(&record)))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::routes::build_router;
    use crate::state::AppState;

    async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let resp = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_step_endpoint_success_envelope() {
        let app = build_router(AppState::in_memory());
        let (status, started) = post(
            &app,
            "/api/onboarding/start",
            json!({"employee_id": "EMP-1", "employee_name": "Mo Chen"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(started["success"], true);
        let session_id = started["session_id"].as_str().unwrap().to_string();

        let (status, body) = post(
            &app,
            "/api/onboarding/welcome",
            json!({"session_id": session_id, "preferred_name": "Mo"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["current_step"]["slug"], "personal-info");
        assert_eq!(body["data"]["welcome"]["preferred_name"], "Mo");
    }

    #[tokio::test]
    async fn test_unknown_session_reports_message() {
        let app = build_router(AppState::in_memory());
        let (status, body) = post(
            &app,
            "/api/onboarding/welcome",
            json!({"session_id": uuid::Uuid::new_v4()}),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Onboarding session not found");
    }

    #[tokio::test]
    async fn test_list_steps() {
        let app = build_router(AppState::in_memory());
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/api/onboarding/steps")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let steps: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(steps.as_array().unwrap().len(), 20);
    }
}
