//! Dashboard summary. Every figure is derived from the current store snapshot.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::errors::AppError;
use crate::payroll::models::PayrollTotals;
use crate::performance::models::{summarize, ReviewSummary};
use crate::state::AppState;
use crate::talent::models::PipelineStage;
use crate::talent::pipeline::partition;
use crate::workflow::{ProcessKind, ProcessRecord, ProcessStatus};

#[derive(Debug, Serialize)]
pub struct StageCount {
    pub stage: PipelineStage,
    pub title: &'static str,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Serialize)]
pub struct ProcessCounts {
    pub active: usize,
    pub completed: usize,
    pub total: usize,
}

impl ProcessCounts {
    fn from_records(records: &[ProcessRecord]) -> Self {
        let active = records.iter().filter(|r| !r.status.is_terminal()).count();
        let completed = records
            .iter()
            .filter(|r| r.status == ProcessStatus::Completed)
            .count();
        Self {
            active,
            completed,
            total: records.len(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub total_candidates: usize,
    pub candidates_by_stage: Vec<StageCount>,
    pub onboarding: ProcessCounts,
    pub exits: ProcessCounts,
    pub latest_payroll_period: Option<String>,
    pub latest_payroll_totals: Option<PayrollTotals>,
    pub reviews: ReviewSummary,
}

/// GET /api/dashboard/summary
pub async fn handle_summary(
    State(state): State<AppState>,
) -> Result<Json<DashboardSummary>, AppError> {
    let candidates = state.store.list_candidates().await?;
    let onboarding = state.store.list_processes(ProcessKind::Onboarding).await?;
    let exits = state.store.list_processes(ProcessKind::Exit).await?;
    let runs = state.store.list_payroll_runs().await?;
    let reviews = state.store.list_reviews().await?;

    let pipeline = partition(&candidates);
    let latest_run = runs.iter().max_by_key(|r| r.processed_at);

    Ok(Json(DashboardSummary {
        total_candidates: pipeline.total,
        candidates_by_stage: pipeline
            .buckets
            .into_iter()
            .map(|b| StageCount {
                stage: b.stage,
                title: b.title,
                count: b.count,
                percentage: b.percentage,
            })
            .collect(),
        onboarding: ProcessCounts::from_records(&onboarding),
        exits: ProcessCounts::from_records(&exits),
        latest_payroll_period: latest_run.map(|r| r.period.clone()),
        latest_payroll_totals: latest_run.map(|r| r.totals.clone()),
        reviews: summarize(&reviews),
    }))
}
