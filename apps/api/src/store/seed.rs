//! Demo records loaded into an empty store at startup.

use anyhow::Result;
use chrono::{Duration, Utc};
use rust_decimal_macros::dec;
use tracing::info;

use crate::payroll::models::PayrollEntry;
use crate::performance::models::{NewReview, ReviewStatus};
use crate::store::HrStore;
use crate::talent::models::{Candidate, CandidateScores, PipelineStage};

struct DemoCandidate {
    name: &'static str,
    email: &'static str,
    position: &'static str,
    skills: &'static [&'static str],
    stage: PipelineStage,
    scores: (Option<u8>, Option<u8>, Option<u8>),
}

const DEMO_CANDIDATES: &[DemoCandidate] = &[
    DemoCandidate {
        name: "Priya Raman",
        email: "priya.raman@example.com",
        position: "Senior Backend Engineer",
        skills: &["rust", "postgres", "kubernetes"],
        stage: PipelineStage::TechnicalInterview,
        scores: (Some(88), Some(82), None),
    },
    DemoCandidate {
        name: "Marcus Hale",
        email: "marcus.hale@example.com",
        position: "Product Designer",
        skills: &["figma", "user research"],
        stage: PipelineStage::Screening,
        scores: (None, Some(90), None),
    },
    DemoCandidate {
        name: "Elena Sousa",
        email: "elena.sousa@example.com",
        position: "Data Analyst",
        skills: &["sql", "python", "tableau"],
        stage: PipelineStage::Offer,
        scores: (Some(91), Some(87), Some(93)),
    },
    DemoCandidate {
        name: "Tomás Vidal",
        email: "tomas.vidal@example.com",
        position: "Senior Backend Engineer",
        skills: &["go", "aws"],
        stage: PipelineStage::Applied,
        scores: (None, None, None),
    },
    DemoCandidate {
        name: "Grace Okafor",
        email: "grace.okafor@example.com",
        position: "HR Business Partner",
        skills: &["employee relations", "workday"],
        stage: PipelineStage::Rejected,
        scores: (Some(65), Some(72), Some(70)),
    },
];

pub async fn seed_demo_data(store: &dyn HrStore) -> Result<()> {
    if !store.list_candidates().await?.is_empty() {
        info!("Store already has data, skipping demo seed");
        return Ok(());
    }

    let now = Utc::now();
    for (i, demo) in DEMO_CANDIDATES.iter().enumerate() {
        let mut candidate = Candidate::new(
            demo.name,
            demo.email,
            demo.position,
            demo.skills.iter().map(|s| s.to_string()).collect(),
        );
        candidate.applied_at = now - Duration::days(30 - i as i64 * 5);
        candidate.current_stage = demo.stage;
        candidate.scores = CandidateScores {
            technical: demo.scores.0,
            communication: demo.scores.1,
            cultural_fit: demo.scores.2,
        };
        store.insert_candidate(&candidate).await?;
    }

    let entries = [
        ("EMP-001", "Jordan Lee", "Engineering", dec!(8200), dec!(400), dec!(350), dec!(0.24)),
        ("EMP-002", "Sasha Novak", "People", dec!(6100), dec!(250), dec!(210), dec!(0.21)),
        ("EMP-003", "Chris Mensah", "Finance", dec!(7000), dec!(300), dec!(280), dec!(0.22)),
        ("EMP-004", "Ines Duarte", "Sales", dec!(5400), dec!(900), dec!(150), dec!(0.20)),
    ];
    for (id, name, dept, base, allowances, deductions, tax_rate) in entries {
        store
            .upsert_payroll_entry(&PayrollEntry {
                employee_id: id.to_string(),
                employee_name: name.to_string(),
                department: dept.to_string(),
                base_salary: base,
                allowances,
                deductions,
                tax_rate,
            })
            .await?;
    }

    let reviews = [
        ("EMP-001", "Jordan Lee", 4, 5, 4, ReviewStatus::Completed),
        ("EMP-002", "Sasha Novak", 5, 4, 4, ReviewStatus::Completed),
        ("EMP-003", "Chris Mensah", 3, 6, 3, ReviewStatus::Submitted),
        ("EMP-004", "Ines Duarte", 4, 3, 1, ReviewStatus::Draft),
    ];
    for (id, name, rating, goals_total, goals_met, status) in reviews {
        let review = NewReview {
            employee_id: id.to_string(),
            employee_name: name.to_string(),
            reviewer: "Alex Morgan".to_string(),
            period: "2026-H1".to_string(),
            rating,
            goals_total,
            goals_met,
            status: Some(status),
            comments: None,
        }
        .into_review();
        store.insert_review(&review).await?;
    }

    info!(
        "Seeded {} candidates, {} payroll entries, {} reviews",
        DEMO_CANDIDATES.len(),
        entries.len(),
        reviews.len()
    );
    Ok(())
}
