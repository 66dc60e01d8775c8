pub mod health;
pub mod processes;

use axum::{
    extract::FromRequest,
    routing::{get, patch, post},
    Json, Router,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::state::AppState;
use crate::{dashboard, exit, onboarding, payroll, performance, simulation, talent};

/// Success envelope for mutating endpoints: `{ "success": true, ...data }`.
#[derive(Debug, Serialize)]
pub struct Ack<T> {
    pub success: bool,
    #[serde(flatten)]
    pub data: T,
}

pub fn ack<T: Serialize>(data: T) -> Json<Ack<T>> {
    Json(Ack {
        success: true,
        data,
    })
}

/// JSON body extractor whose rejections use the `{ success: false, message }`
/// error body instead of axum's plain-text 4xx.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Process records (shared by onboarding and exit)
        .route("/api/processes/:id", get(processes::handle_get_process))
        .route(
            "/api/processes/:id/events",
            get(processes::handle_process_events),
        )
        // Onboarding wizard
        .route("/api/onboarding/steps", get(onboarding::handlers::handle_list_steps))
        .route("/api/onboarding/start", post(onboarding::handlers::handle_start))
        .route(
            "/api/onboarding/sessions",
            get(onboarding::handlers::handle_list_sessions),
        )
        .route(
            "/api/onboarding/session/:session_id",
            get(onboarding::handlers::handle_get_session),
        )
        .route(
            "/api/onboarding/session/:session_id/back",
            post(onboarding::handlers::handle_step_back),
        )
        .route("/api/onboarding/:step", post(onboarding::handlers::handle_submit_step))
        // Exit management
        .route("/api/exit/resign", post(exit::handlers::handle_resign))
        .route("/api/exit/withdraw", post(exit::handlers::handle_withdraw))
        .route("/api/exit/processes", get(exit::handlers::handle_list_exits))
        .route(
            "/api/exit/process/:exit_id",
            get(exit::handlers::handle_get_exit),
        )
        .route("/api/exit/:action", post(exit::handlers::handle_exit_step))
        // Talent acquisition
        .route(
            "/api/talent-acquisition/candidates",
            get(talent::handlers::handle_list_candidates)
                .post(talent::handlers::handle_create_candidate),
        )
        .route(
            "/api/talent-acquisition/candidates/bulk",
            post(talent::handlers::handle_bulk_action),
        )
        .route(
            "/api/talent-acquisition/candidates/:id",
            get(talent::handlers::handle_get_candidate),
        )
        .route(
            "/api/talent-acquisition/candidates/:id/stage",
            patch(talent::handlers::handle_move_stage),
        )
        .route(
            "/api/talent-acquisition/pipeline",
            get(talent::handlers::handle_pipeline),
        )
        // Payroll
        .route("/api/payroll/entries", get(payroll::handlers::handle_list_entries))
        .route("/api/payroll/runs", get(payroll::handlers::handle_list_runs))
        .route("/api/payroll/process", post(payroll::handlers::handle_process))
        // Performance
        .route(
            "/api/performance/reviews",
            get(performance::handlers::handle_list_reviews)
                .post(performance::handlers::handle_create_review),
        )
        .route(
            "/api/performance/summary",
            get(performance::handlers::handle_summary),
        )
        // Dashboard
        .route("/api/dashboard/summary", get(dashboard::handle_summary))
        // Simulated demos
        .route(
            "/api/interview/sessions",
            post(simulation::handlers::handle_start_interview),
        )
        .route(
            "/api/interview/sessions/:id",
            get(simulation::handlers::handle_get_interview),
        )
        .route(
            "/api/interview/sessions/:id/answer",
            post(simulation::handlers::handle_answer),
        )
        .route(
            "/api/resume/analyze",
            post(simulation::handlers::handle_analyze_resume),
        )
        .with_state(state)
}
