//! Resume analyzer demo. Text is extracted for real (PDF via `pdf-extract`),
//! skills are matched against a fixed vocabulary, and every score is random.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::simulation::SimulationConfig;

const SKILL_VOCABULARY: &[&str] = &[
    "rust",
    "python",
    "java",
    "javascript",
    "typescript",
    "react",
    "node.js",
    "sql",
    "postgresql",
    "aws",
    "docker",
    "kubernetes",
    "machine learning",
    "data analysis",
    "project management",
    "agile",
    "leadership",
    "communication",
    "recruiting",
    "payroll",
    "excel",
    "tableau",
];

#[derive(Debug, Clone, Serialize)]
pub struct ResumeAnalysis {
    pub overall_score: u8,
    pub skills_match: u8,
    pub experience_score: u8,
    pub education_score: u8,
    pub detected_skills: Vec<String>,
    pub word_count: usize,
    pub recommendations: Vec<String>,
}

/// Extracts plain text from an uploaded PDF. CPU-bound; runs on the blocking pool.
pub async fn extract_pdf_text(bytes: bytes::Bytes) -> Result<String> {
    tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .context("PDF extraction task failed")?
        .map_err(|e| anyhow::anyhow!("Could not read text from PDF: {e}"))
}

/// True when `term` occurs in `text` bounded by non-alphanumeric characters,
/// so "java" does not match inside "javascript".
fn contains_term(text: &str, term: &str) -> bool {
    text.match_indices(term).any(|(start, _)| {
        let before = text[..start].chars().next_back();
        let after = text[start + term.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

pub fn detect_skills(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    SKILL_VOCABULARY
        .iter()
        .filter(|skill| contains_term(&lower, skill))
        .map(|skill| skill.to_string())
        .collect()
}

fn recommendations(text: &str, skills: &[String], word_count: usize) -> Vec<String> {
    let mut recs = Vec::new();
    if skills.len() < 3 {
        recs.push("List more of your relevant technical and soft skills".to_string());
    }
    if word_count < 200 {
        recs.push("Expand your experience section with responsibilities and outcomes".to_string());
    }
    if !text.chars().any(|c| c.is_ascii_digit()) {
        recs.push("Quantify achievements with numbers, percentages or amounts".to_string());
    }
    recs
}

/// Produces a simulated analysis after the configured delay.
pub async fn analyze(text: &str, sim: &SimulationConfig) -> ResumeAnalysis {
    let detected_skills = detect_skills(text);
    let word_count = text.split_whitespace().count();
    let recommendations = recommendations(text, &detected_skills, word_count);

    sim.pause().await;

    let skills_match = sim.draw_score();
    let experience_score = sim.draw_score();
    let education_score = sim.draw_score();
    let overall_score =
        ((skills_match as u32 + experience_score as u32 + education_score as u32) / 3) as u8;

    info!(
        "Resume analyzed: {word_count} words, {} skills, score {overall_score}",
        detected_skills.len()
    );

    ResumeAnalysis {
        overall_score,
        skills_match,
        experience_score,
        education_score,
        detected_skills,
        word_count,
        recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_detect_skills_case_insensitive() {
        let skills = detect_skills("Led a team using Rust, PostgreSQL and Kubernetes. Strong Leadership.");
        assert!(skills.contains(&"rust".to_string()));
        assert!(skills.contains(&"postgresql".to_string()));
        assert!(skills.contains(&"kubernetes".to_string()));
        assert!(skills.contains(&"leadership".to_string()));
        assert!(!skills.contains(&"java".to_string()));
    }

    #[test]
    fn test_detect_skills_matches_whole_words() {
        let skills = detect_skills("JavaScript developer, trusted by a fragile legacy team. Node.js, Java.");
        assert_eq!(
            skills,
            vec!["java".to_string(), "javascript".to_string(), "node.js".to_string()]
        );
        assert!(detect_skills("Trust and fragility").is_empty());
        assert_eq!(detect_skills("machine learning with rust"), vec!["rust", "machine learning"]);
    }

    #[test]
    fn test_recommendations_for_thin_resume() {
        let recs = recommendations("Worked at a shop", &[], 4);
        assert_eq!(recs.len(), 3);
    }

    #[tokio::test]
    async fn test_analyze_scores_in_range() {
        let sim = SimulationConfig::new(Duration::ZERO);
        let a = analyze("Python and SQL analyst, cut report time by 40%", &sim).await;
        for s in [a.overall_score, a.skills_match, a.experience_score, a.education_score] {
            assert!((70..=100).contains(&s));
        }
        assert_eq!(a.word_count, 9);
        assert_eq!(a.detected_skills, vec!["python".to_string(), "sql".to_string()]);
    }

    #[tokio::test]
    async fn test_invalid_pdf_is_an_error() {
        let err = extract_pdf_text(bytes::Bytes::from_static(b"not a pdf")).await;
        assert!(err.is_err());
    }
}
