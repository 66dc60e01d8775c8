use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::routes::{ack, Ack, AppJson};
use crate::state::AppState;
use crate::talent::models::{Candidate, CandidateScores, PipelineStage};
use crate::talent::pipeline::{apply_action, partition, BulkAction, BulkReport, PipelineView};

#[derive(Debug, Deserialize)]
pub struct CandidateFilter {
    pub stage: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewCandidateRequest {
    pub name: String,
    pub email: String,
    pub position: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub scores: CandidateScores,
}

impl NewCandidateRequest {
    fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() || self.position.trim().is_empty() {
            return Err(AppError::Validation(
                "name and position are required".to_string(),
            ));
        }
        if !self.email.contains('@') {
            return Err(AppError::Validation(format!(
                "'{}' is not a valid email address",
                self.email
            )));
        }
        let scores = [
            self.scores.technical,
            self.scores.communication,
            self.scores.cultural_fit,
        ];
        if scores.into_iter().flatten().any(|s| s > 100) {
            return Err(AppError::Validation(
                "scores must be between 0 and 100".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct MoveStageRequest {
    pub stage: PipelineStage,
}

#[derive(Debug, Deserialize)]
pub struct BulkRequest {
    pub action: BulkAction,
    pub candidate_ids: Vec<Uuid>,
}

/// GET /api/talent-acquisition/candidates?stage=
pub async fn handle_list_candidates(
    State(state): State<AppState>,
    Query(filter): Query<CandidateFilter>,
) -> Result<Json<Vec<Candidate>>, AppError> {
    let stage = filter
        .stage
        .as_deref()
        .map(str::parse::<PipelineStage>)
        .transpose()
        .map_err(AppError::Validation)?;
    let candidates = state.store.list_candidates().await?;
    Ok(Json(
        candidates
            .into_iter()
            .filter(|c| stage.map_or(true, |s| c.current_stage == s))
            .collect(),
    ))
}

/// POST /api/talent-acquisition/candidates
pub async fn handle_create_candidate(
    State(state): State<AppState>,
    AppJson(req): AppJson<NewCandidateRequest>,
) -> Result<Json<Ack<Candidate>>, AppError> {
    req.validate()?;
    let mut candidate = Candidate::new(&req.name, &req.email, &req.position, req.skills);
    candidate.scores = req.scores;
    state.store.insert_candidate(&candidate).await?;
    info!("Candidate {} ({}) added to pipeline", candidate.id, candidate.name);
    Ok(ack(candidate))
}

/// GET /api/talent-acquisition/candidates/:id
pub async fn handle_get_candidate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Candidate>, AppError> {
    let candidate = state
        .store
        .get_candidate(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Candidate {id} not found")))?;
    Ok(Json(candidate))
}

/// PATCH /api/talent-acquisition/candidates/:id/stage
///
/// Forward-only move, or rejection from any open stage.
pub async fn handle_move_stage(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(req): AppJson<MoveStageRequest>,
) -> Result<Json<Ack<Candidate>>, AppError> {
    let mut candidate = state
        .store
        .get_candidate(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Candidate {id} not found")))?;
    let from = candidate.current_stage;
    candidate.move_to(req.stage).map_err(AppError::Conflict)?;
    state.store.update_candidate(&candidate).await?;
    info!("Candidate {id} moved from {from} to {}", candidate.current_stage);
    Ok(ack(candidate))
}

/// GET /api/talent-acquisition/pipeline
pub async fn handle_pipeline(State(state): State<AppState>) -> Result<Json<PipelineView>, AppError> {
    let candidates = state.store.list_candidates().await?;
    Ok(Json(partition(&candidates)))
}

/// POST /api/talent-acquisition/candidates/bulk
///
/// Applies one action to every selected candidate and reports a single
/// aggregate outcome.
pub async fn handle_bulk_action(
    State(state): State<AppState>,
    AppJson(req): AppJson<BulkRequest>,
) -> Result<Json<BulkReport>, AppError> {
    if req.candidate_ids.is_empty() {
        return Err(AppError::Validation("No candidates selected".to_string()));
    }

    let mut processed = 0;
    let mut failed = 0;
    for id in &req.candidate_ids {
        let Some(mut candidate) = state.store.get_candidate(*id).await? else {
            warn!("Bulk {:?}: candidate {id} not found", req.action);
            failed += 1;
            continue;
        };
        if let Err(reason) = apply_action(req.action, &mut candidate) {
            warn!("Bulk {:?}: {reason}", req.action);
            failed += 1;
            continue;
        }
        if req.action == BulkAction::Email {
            info!("Status email queued for {} <{}>", candidate.name, candidate.email);
        } else {
            state.store.update_candidate(&candidate).await?;
        }
        processed += 1;
    }

    let report = BulkReport::new(req.action, processed, failed);
    info!("Bulk {:?}: {}", req.action, report.message);
    Ok(Json(report))
}
