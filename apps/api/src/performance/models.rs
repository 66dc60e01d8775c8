use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::talent::pipeline::percentage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    Draft,
    Submitted,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceReview {
    pub id: Uuid,
    pub employee_id: String,
    pub employee_name: String,
    pub reviewer: String,
    /// Review cycle label, e.g. `2026-H1`.
    pub period: String,
    /// 1 (poor) to 5 (outstanding).
    pub rating: u8,
    pub goals_total: u32,
    pub goals_met: u32,
    pub status: ReviewStatus,
    pub comments: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub const RATING_RANGE: std::ops::RangeInclusive<u8> = 1..=5;

#[derive(Debug, Clone, Deserialize)]
pub struct NewReview {
    pub employee_id: String,
    pub employee_name: String,
    pub reviewer: String,
    pub period: String,
    pub rating: u8,
    pub goals_total: u32,
    pub goals_met: u32,
    #[serde(default)]
    pub status: Option<ReviewStatus>,
    #[serde(default)]
    pub comments: Option<String>,
}

impl NewReview {
    pub fn validate(&self) -> Result<(), String> {
        if self.employee_id.trim().is_empty() || self.employee_name.trim().is_empty() {
            return Err("employee_id and employee_name are required".to_string());
        }
        if self.reviewer.trim().is_empty() {
            return Err("reviewer is required".to_string());
        }
        if !RATING_RANGE.contains(&self.rating) {
            return Err(format!("rating must be between 1 and 5, got {}", self.rating));
        }
        if self.goals_met > self.goals_total {
            return Err("goals_met cannot exceed goals_total".to_string());
        }
        Ok(())
    }

    pub fn into_review(self) -> PerformanceReview {
        PerformanceReview {
            id: Uuid::new_v4(),
            employee_id: self.employee_id,
            employee_name: self.employee_name,
            reviewer: self.reviewer,
            period: self.period,
            rating: self.rating,
            goals_total: self.goals_total,
            goals_met: self.goals_met,
            status: self.status.unwrap_or(ReviewStatus::Draft),
            comments: self.comments,
            created_at: Utc::now(),
        }
    }
}

/// A review with its display-only percentages.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewView {
    #[serde(flatten)]
    pub review: PerformanceReview,
    pub goal_attainment: f64,
}

impl From<PerformanceReview> for ReviewView {
    fn from(review: PerformanceReview) -> Self {
        let goal_attainment = percentage(review.goals_met as usize, review.goals_total as usize);
        Self {
            review,
            goal_attainment,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewSummary {
    pub total: usize,
    pub completed: usize,
    pub completion_percentage: f64,
    pub average_rating: Option<f64>,
    /// Count of reviews per rating, index 0 = rating 1.
    pub rating_distribution: [usize; 5],
}

pub fn summarize(reviews: &[PerformanceReview]) -> ReviewSummary {
    let total = reviews.len();
    let completed = reviews
        .iter()
        .filter(|r| r.status == ReviewStatus::Completed)
        .count();
    let average_rating = if total == 0 {
        None
    } else {
        Some(reviews.iter().map(|r| r.rating as f64).sum::<f64>() / total as f64)
    };
    let mut rating_distribution = [0usize; 5];
    for r in reviews {
        if RATING_RANGE.contains(&r.rating) {
            rating_distribution[(r.rating - 1) as usize] += 1;
        }
    }
    ReviewSummary {
        total,
        completed,
        completion_percentage: percentage(completed, total),
        average_rating,
        rating_distribution,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_review(rating: u8, met: u32, total: u32) -> NewReview {
        NewReview {
            employee_id: "E-1".into(),
            employee_name: "Rin".into(),
            reviewer: "Morgan".into(),
            period: "2026-H1".into(),
            rating,
            goals_total: total,
            goals_met: met,
            status: None,
            comments: None,
        }
    }

    #[test]
    fn test_validate_rating_bounds() {
        assert!(new_review(0, 1, 2).validate().is_err());
        assert!(new_review(6, 1, 2).validate().is_err());
        assert!(new_review(5, 1, 2).validate().is_ok());
    }

    #[test]
    fn test_validate_goals() {
        assert!(new_review(3, 3, 2).validate().is_err());
    }

    #[test]
    fn test_goal_attainment_computed_on_view() {
        let view = ReviewView::from(new_review(4, 3, 4).into_review());
        assert!((view.goal_attainment - 75.0).abs() < 1e-9);
        let none = ReviewView::from(new_review(4, 0, 0).into_review());
        assert_eq!(none.goal_attainment, 0.0);
    }

    #[test]
    fn test_summary() {
        let mut a = new_review(4, 1, 1).into_review();
        a.status = ReviewStatus::Completed;
        let b = new_review(2, 0, 1).into_review();
        let s = summarize(&[a, b]);
        assert_eq!(s.total, 2);
        assert_eq!(s.completed, 1);
        assert!((s.completion_percentage - 50.0).abs() < 1e-9);
        assert_eq!(s.average_rating, Some(3.0));
        assert_eq!(s.rating_distribution, [0, 1, 0, 1, 0]);
    }

    #[test]
    fn test_summary_empty() {
        let s = summarize(&[]);
        assert_eq!(s.average_rating, None);
        assert_eq!(s.completion_percentage, 0.0);
    }
}
