use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::routes::{ack, Ack, AppJson};
use crate::simulation::interview::{InterviewError, InterviewSession};
use crate::simulation::resume::{analyze, extract_pdf_text, ResumeAnalysis};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StartInterviewRequest {
    pub candidate_name: String,
    pub position: String,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub content: String,
}

impl From<InterviewError> for AppError {
    fn from(e: InterviewError) -> Self {
        match e {
            InterviewError::NotFound => AppError::NotFound("Interview session not found".to_string()),
            InterviewError::Finished => {
                AppError::Conflict("Interview has already finished".to_string())
            }
            InterviewError::EmptyAnswer => AppError::Validation("Answer cannot be empty".to_string()),
        }
    }
}

/// POST /api/interview/sessions
pub async fn handle_start_interview(
    State(state): State<AppState>,
    AppJson(req): AppJson<StartInterviewRequest>,
) -> Result<Json<Ack<InterviewSession>>, AppError> {
    if req.candidate_name.trim().is_empty() {
        return Err(AppError::Validation("candidate_name cannot be empty".to_string()));
    }
    let session = state
        .interviews
        .start(req.candidate_name.trim(), req.position.trim())
        .await;
    Ok(ack(session))
}

/// GET /api/interview/sessions/:id
pub async fn handle_get_interview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<InterviewSession>, AppError> {
    let session = state.interviews.get(id).await.ok_or(InterviewError::NotFound)?;
    Ok(Json(session))
}

/// POST /api/interview/sessions/:id/answer
///
/// Responds after the simulated analysis delay.
pub async fn handle_answer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(req): AppJson<AnswerRequest>,
) -> Result<Json<Ack<InterviewSession>>, AppError> {
    let session = state
        .interviews
        .answer(id, &req.content, &state.simulation)
        .await?;
    Ok(ack(session))
}

/// POST /api/resume/analyze
///
/// Multipart upload: a `file` field holding a PDF, or a `text` field.
pub async fn handle_analyze_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Ack<ResumeAnalysis>>, AppError> {
    let mut text: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Could not read upload: {e}")))?;
                let extracted = extract_pdf_text(bytes)
                    .await
                    .map_err(|e| AppError::Validation(e.to_string()))?;
                text = Some(extracted);
            }
            Some("text") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Could not read text: {e}")))?;
                text = Some(value);
            }
            _ => {}
        }
    }

    let text = text
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Upload a resume file or paste its text".to_string()))?;

    Ok(ack(analyze(&text, &state.simulation).await))
}
