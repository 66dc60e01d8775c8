use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::errors::AppError;
use crate::exit::service::{self, ExitView, ResignationRequest};
use crate::routes::{ack, Ack, AppJson};
use crate::state::AppState;
use crate::workflow::ProcessKind;

#[derive(Debug, Deserialize)]
pub struct ExitStepRequest {
    pub exit_id: Uuid,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct WithdrawRequest {
    pub exit_id: Uuid,
}

/// POST /api/exit/resign
pub async fn handle_resign(
    State(state): State<AppState>,
    AppJson(req): AppJson<ResignationRequest>,
) -> Result<Json<Ack<ExitView>>, AppError> {
    let record = service::submit_resignation(state.store.as_ref(), &state.events, req).await?;
    Ok(ack(ExitView::from_record(&record)))
}

/// POST /api/exit/:action
pub async fn handle_exit_step(
    State(state): State<AppState>,
    Path(action): Path<String>,
    AppJson(req): AppJson<ExitStepRequest>,
) -> Result<Json<Ack<ExitView>>, AppError> {
    let record = service::record_action(
        state.store.as_ref(),
        &state.events,
        req.exit_id,
        &action,
        req.payload,
    )
    .await?;
    Ok(ack(ExitView::from_record(&record)))
}

/// POST /api/exit/withdraw
pub async fn handle_withdraw(
    State(state): State<AppState>,
    AppJson(req): AppJson<WithdrawRequest>,
) -> Result<Json<Ack<ExitView>>, AppError> {
    let record = service::withdraw(state.store.as_ref(), &state.events, req.exit_id).await?;
    Ok(ack(ExitView::from_record(&record)))
}

/// GET /api/exit/process/:exit_id
pub async fn handle_get_exit(
    State(state): State<AppState>,
    Path(exit_id): Path<Uuid>,
) -> Result<Json<ExitView>, AppError> {
    let record = service::load_exit(state.store.as_ref(), exit_id).await?;
    Ok(Json(ExitView::from_record(&record)))
}

/// GET /api/exit/processes
pub async fn handle_list_exits(
    State(state): State<AppState>,
) -> Result<Json<Vec<ExitView>>, AppError> {
    let records = state.store.list_processes(ProcessKind::Exit).await?;
    Ok(Json(records.iter().map(ExitView::from_record).collect()))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::routes::build_router;
    use crate::state::AppState;

    async fn send(app: &axum::Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(v) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        let resp = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_resign_then_poll_record() {
        let app = build_router(AppState::in_memory());
        let (status, created) = send(
            &app,
            "POST",
            "/api/exit/resign",
            Some(json!({
                "employee_id": "EMP-2",
                "employee_name": "Sasha Novak",
                "reason": "Career change",
                "last_working_day": "2026-12-15"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(created["success"], true);
        assert_eq!(created["status"], "initiated");
        let exit_id = created["exit_id"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app,
            "POST",
            "/api/exit/asset_return",
            Some(json!({"exit_id": exit_id, "items": ["laptop", "badge"]})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "in_progress");

        let (status, snapshot) =
            send(&app, "GET", &format!("/api/exit/process/{exit_id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(snapshot["steps"]["asset_return"], "completed");
        assert_eq!(snapshot["data"]["asset_return"]["items"][0], "laptop");
    }

    #[tokio::test]
    async fn test_step_for_missing_exit_is_rejected() {
        let app = build_router(AppState::in_memory());
        let (status, body) = send(
            &app,
            "POST",
            "/api/exit/exit_interview",
            Some(json!({"exit_id": uuid::Uuid::new_v4()})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Exit process not found");
    }

    #[tokio::test]
    async fn test_malformed_bodies_use_error_envelope() {
        let app = build_router(AppState::in_memory());
        let (status, body) = send(
            &app,
            "POST",
            "/api/exit/resign",
            Some(json!({
                "employee_id": "EMP-2",
                "employee_name": "Sasha Novak",
                "reason": "Career change",
                "last_working_day": "next friday"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert!(body["message"].as_str().unwrap().contains("last_working_day"));

        let (status, body) = send(
            &app,
            "POST",
            "/api/exit/asset_return",
            Some(json!({"items": ["laptop"]})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["message"].as_str().unwrap().contains("exit_id"));
    }

    #[tokio::test]
    async fn test_missing_content_type_uses_error_envelope() {
        let app = build_router(AppState::in_memory());
        let resp = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/exit/withdraw")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
    }
}
