use axum::{extract::State, Json};
use tracing::info;

use crate::errors::AppError;
use crate::performance::models::{summarize, NewReview, ReviewSummary, ReviewView};
use crate::routes::{ack, Ack, AppJson};
use crate::state::AppState;

/// GET /api/performance/reviews
pub async fn handle_list_reviews(
    State(state): State<AppState>,
) -> Result<Json<Vec<ReviewView>>, AppError> {
    let reviews = state.store.list_reviews().await?;
    Ok(Json(reviews.into_iter().map(ReviewView::from).collect()))
}

/// POST /api/performance/reviews
pub async fn handle_create_review(
    State(state): State<AppState>,
    AppJson(req): AppJson<NewReview>,
) -> Result<Json<Ack<ReviewView>>, AppError> {
    req.validate().map_err(AppError::Validation)?;
    let review = req.into_review();
    state.store.insert_review(&review).await?;
    info!(
        "Performance review {} recorded for {} ({})",
        review.id, review.employee_id, review.period
    );
    Ok(ack(ReviewView::from(review)))
}

/// GET /api/performance/summary
pub async fn handle_summary(
    State(state): State<AppState>,
) -> Result<Json<ReviewSummary>, AppError> {
    let reviews = state.store.list_reviews().await?;
    Ok(Json(summarize(&reviews)))
}
