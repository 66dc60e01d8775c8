//! Pipeline views and bulk recruiter actions.
//!
//! Counts and percentages are computed at read time from the candidate list;
//! nothing derived is stored.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::talent::models::{Candidate, PipelineStage};

#[derive(Debug, Clone, Serialize)]
pub struct PipelineBucket {
    pub stage: PipelineStage,
    pub title: &'static str,
    pub count: usize,
    pub percentage: f64,
    pub candidates: Vec<CandidateCard>,
}

/// Candidate as shown inside a pipeline bucket.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateCard {
    pub id: Uuid,
    pub name: String,
    pub position: String,
    pub average_score: Option<u8>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PipelineView {
    pub total: usize,
    pub buckets: Vec<PipelineBucket>,
}

/// `value / total * 100`, or 0 for an empty total.
pub fn percentage(value: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    value as f64 / total as f64 * 100.0
}

/// Groups candidates into one bucket per stage by equality on `current_stage`.
pub fn partition(candidates: &[Candidate]) -> PipelineView {
    let total = candidates.len();
    let buckets = PipelineStage::ALL
        .iter()
        .map(|stage| {
            let cards: Vec<CandidateCard> = candidates
                .iter()
                .filter(|c| c.current_stage == *stage)
                .map(|c| CandidateCard {
                    id: c.id,
                    name: c.name.clone(),
                    position: c.position.clone(),
                    average_score: c.scores.average(),
                })
                .collect();
            PipelineBucket {
                stage: *stage,
                title: stage.title(),
                count: cards.len(),
                percentage: percentage(cards.len(), total),
                candidates: cards,
            }
        })
        .collect();

    PipelineView { total, buckets }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkAction {
    Advance,
    Reject,
    Email,
}

impl BulkAction {
    fn past_tense(&self) -> &'static str {
        match self {
            BulkAction::Advance => "advanced",
            BulkAction::Reject => "rejected",
            BulkAction::Email => "emailed",
        }
    }
}

/// Applies one bulk action to one candidate. Email leaves the stage untouched.
pub fn apply_action(action: BulkAction, candidate: &mut Candidate) -> Result<(), String> {
    match action {
        BulkAction::Advance => candidate.advance().map(|_| ()),
        BulkAction::Reject => candidate.move_to(PipelineStage::Rejected),
        BulkAction::Email => Ok(()),
    }
}

/// Single aggregate result for a bulk request; no per-item detail.
#[derive(Debug, Clone, Serialize)]
pub struct BulkReport {
    pub success: bool,
    pub message: String,
    pub processed: usize,
    pub failed: usize,
}

impl BulkReport {
    pub fn new(action: BulkAction, processed: usize, failed: usize) -> Self {
        let total = processed + failed;
        let verb = action.past_tense();
        let message = if failed == 0 {
            format!("{processed} candidate(s) {verb} successfully")
        } else {
            format!("{processed} of {total} candidate(s) {verb}; {failed} could not be updated")
        };
        Self {
            success: failed == 0,
            message,
            processed,
            failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(stage: PipelineStage, name: &str) -> Candidate {
        let mut c = Candidate::new(name, "x@example.com", "Engineer", vec![]);
        c.current_stage = stage;
        c
    }

    fn sample() -> Vec<Candidate> {
        vec![
            at(PipelineStage::Applied, "a"),
            at(PipelineStage::Applied, "b"),
            at(PipelineStage::Screening, "c"),
            at(PipelineStage::Offer, "d"),
            at(PipelineStage::Rejected, "e"),
        ]
    }

    #[test]
    fn test_bucket_counts_sum_to_total() {
        let candidates = sample();
        let view = partition(&candidates);
        let sum: usize = view.buckets.iter().map(|b| b.count).sum();
        assert_eq!(sum, candidates.len());
        assert_eq!(view.total, 5);
    }

    #[test]
    fn test_each_candidate_in_exactly_one_bucket() {
        let candidates = sample();
        let view = partition(&candidates);
        for c in &candidates {
            let hits = view
                .buckets
                .iter()
                .filter(|b| b.candidates.iter().any(|card| card.id == c.id))
                .count();
            assert_eq!(hits, 1, "{} appeared {hits} times", c.name);
        }
    }

    #[test]
    fn test_bucket_percentages() {
        let view = partition(&sample());
        let applied = &view.buckets[0];
        assert_eq!(applied.stage, PipelineStage::Applied);
        assert!((applied.percentage - 40.0).abs() < 1e-9);
        let total: f64 = view.buckets.iter().map(|b| b.percentage).sum();
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_pipeline_has_zero_percentages() {
        let view = partition(&[]);
        assert_eq!(view.buckets.len(), PipelineStage::ALL.len());
        assert!(view.buckets.iter().all(|b| b.percentage == 0.0));
    }

    #[test]
    fn test_apply_action_email_keeps_stage() {
        let mut c = at(PipelineStage::Screening, "a");
        apply_action(BulkAction::Email, &mut c).unwrap();
        assert_eq!(c.current_stage, PipelineStage::Screening);
    }

    #[test]
    fn test_apply_action_advance_fails_at_hired() {
        let mut c = at(PipelineStage::Hired, "a");
        assert!(apply_action(BulkAction::Advance, &mut c).is_err());
    }

    #[test]
    fn test_bulk_report_aggregate_message() {
        let ok = BulkReport::new(BulkAction::Advance, 3, 0);
        assert!(ok.success);
        assert_eq!(ok.message, "3 candidate(s) advanced successfully");

        let partial = BulkReport::new(BulkAction::Reject, 2, 1);
        assert!(!partial.success);
        assert!(partial.message.contains("2 of 3"));
    }
}
