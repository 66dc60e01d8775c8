use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::payroll::calc::{build_run, normalize_period};
use crate::payroll::models::{PayrollEntry, PayrollRun};
use crate::routes::{ack, Ack, AppJson};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ProcessPayrollRequest {
    pub period: String,
}

/// GET /api/payroll/entries
pub async fn handle_list_entries(
    State(state): State<AppState>,
) -> Result<Json<Vec<PayrollEntry>>, AppError> {
    Ok(Json(state.store.list_payroll_entries().await?))
}

/// GET /api/payroll/runs
pub async fn handle_list_runs(
    State(state): State<AppState>,
) -> Result<Json<Vec<PayrollRun>>, AppError> {
    Ok(Json(state.store.list_payroll_runs().await?))
}

/// POST /api/payroll/process
///
/// Computes and stores the payroll run for a period. Each period is processed once.
pub async fn handle_process(
    State(state): State<AppState>,
    AppJson(req): AppJson<ProcessPayrollRequest>,
) -> Result<Json<Ack<PayrollRun>>, AppError> {
    let period = normalize_period(&req.period).map_err(AppError::Validation)?;

    let entries = state.store.list_payroll_entries().await?;
    if entries.is_empty() {
        return Err(AppError::Validation(
            "No payroll entries to process".to_string(),
        ));
    }

    let run = build_run(&period, &entries);
    if !state.store.insert_payroll_run(&run).await? {
        return Err(AppError::Conflict(format!(
            "Payroll for {period} has already been processed"
        )));
    }
    info!(
        "Payroll run {} processed for {period}: {} employees, net {}",
        run.id, run.totals.employees, run.totals.net
    );
    Ok(ack(run))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::routes::build_router;
    use crate::state::AppState;
    use crate::store::seed::seed_demo_data;

    async fn process(app: &axum::Router, period: &str) -> (StatusCode, Value) {
        let resp = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/payroll/process")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(json!({ "period": period }).to_string()))
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
    async fn test_process_once_per_period() {
        let state = AppState::in_memory();
        seed_demo_data(state.store.as_ref()).await.unwrap();
        let app = build_router(state);

        let (status, body) = process(&app, "2026-10").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["totals"]["employees"], 4);
        assert_eq!(body["lines"].as_array().unwrap().len(), 4);

        let (status, body) = process(&app, "2026-10").await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["message"], "Payroll for 2026-10 has already been processed");
    }

    #[tokio::test]
    async fn test_unpadded_month_is_the_same_period() {
        let state = AppState::in_memory();
        seed_demo_data(state.store.as_ref()).await.unwrap();
        let app = build_router(state.clone());

        let (status, body) = process(&app, "2026-01").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["period"], "2026-01");

        let (status, body) = process(&app, "2026-1").await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["success"], false);
        assert_eq!(state.store.list_payroll_runs().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_runs_for_one_period() {
        let state = AppState::in_memory();
        seed_demo_data(state.store.as_ref()).await.unwrap();
        let app = build_router(state.clone());

        let ((a, _), (b, _)) = tokio::join!(process(&app, "2026-02"), process(&app, "2026-02"));
        let mut statuses = [a, b];
        statuses.sort();
        assert_eq!(statuses, [StatusCode::OK, StatusCode::CONFLICT]);
        assert_eq!(state.store.list_payroll_runs().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_period_and_empty_payroll() {
        let app = build_router(AppState::in_memory());
        let (status, _) = process(&app, "10/2026").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, body) = process(&app, "2026-10").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "No payroll entries to process");
    }
}
