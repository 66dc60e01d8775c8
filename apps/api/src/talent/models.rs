use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::workflow::registry::{Stage, PIPELINE_STAGES};

/// Recruitment progress of a candidate.
///
/// Progresses linearly Applied → … → Hired. `Rejected` is terminal and reachable
/// from any non-terminal stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Applied,
    Screening,
    PhoneInterview,
    TechnicalInterview,
    FinalInterview,
    Offer,
    Hired,
    Rejected,
}

impl PipelineStage {
    /// Display order for pipeline buckets.
    pub const ALL: [PipelineStage; 8] = [
        PipelineStage::Applied,
        PipelineStage::Screening,
        PipelineStage::PhoneInterview,
        PipelineStage::TechnicalInterview,
        PipelineStage::FinalInterview,
        PipelineStage::Offer,
        PipelineStage::Hired,
        PipelineStage::Rejected,
    ];

    pub fn next(&self) -> Option<PipelineStage> {
        use PipelineStage::*;
        match self {
            Applied => Some(Screening),
            Screening => Some(PhoneInterview),
            PhoneInterview => Some(TechnicalInterview),
            TechnicalInterview => Some(FinalInterview),
            FinalInterview => Some(Offer),
            Offer => Some(Hired),
            Hired | Rejected => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineStage::Hired | PipelineStage::Rejected)
    }

    /// Forward moves (skipping allowed) or rejection from any open stage.
    pub fn can_transition_to(&self, target: PipelineStage) -> bool {
        if self.is_terminal() {
            return false;
        }
        target == PipelineStage::Rejected || target > *self
    }

    /// Registry entry for this stage. `Rejected` sits outside the linear registry.
    pub fn stage(&self) -> Option<&'static Stage> {
        PIPELINE_STAGES.iter().find(|s| s.slug == self.as_str())
    }

    pub fn title(&self) -> &'static str {
        self.stage().map(|s| s.title).unwrap_or("Rejected")
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Applied => "applied",
            PipelineStage::Screening => "screening",
            PipelineStage::PhoneInterview => "phone_interview",
            PipelineStage::TechnicalInterview => "technical_interview",
            PipelineStage::FinalInterview => "final_interview",
            PipelineStage::Offer => "offer",
            PipelineStage::Hired => "hired",
            PipelineStage::Rejected => "rejected",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PipelineStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PipelineStage::ALL
            .iter()
            .copied()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| format!("Unknown pipeline stage '{s}'"))
    }
}

/// Assessment scores, each 0 to 100. Missing scores have not been assessed yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateScores {
    pub technical: Option<u8>,
    pub communication: Option<u8>,
    pub cultural_fit: Option<u8>,
}

impl CandidateScores {
    /// Mean of the assessed scores, rounded down. None when nothing is assessed.
    pub fn average(&self) -> Option<u8> {
        let assessed: Vec<u32> = [self.technical, self.communication, self.cultural_fit]
            .into_iter()
            .flatten()
            .map(u32::from)
            .collect();
        if assessed.is_empty() {
            return None;
        }
        Some((assessed.iter().sum::<u32>() / assessed.len() as u32) as u8)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub position: String,
    pub skills: Vec<String>,
    pub scores: CandidateScores,
    pub current_stage: PipelineStage,
    pub applied_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Candidate {
    pub fn new(name: &str, email: &str, position: &str, skills: Vec<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            position: position.to_string(),
            skills,
            scores: CandidateScores::default(),
            current_stage: PipelineStage::Applied,
            applied_at: now,
            updated_at: now,
        }
    }

    /// Moves the candidate to `target` if the transition is allowed.
    pub fn move_to(&mut self, target: PipelineStage) -> Result<(), String> {
        if !self.current_stage.can_transition_to(target) {
            return Err(format!(
                "Cannot move {} from {} to {}",
                self.name, self.current_stage, target
            ));
        }
        self.current_stage = target;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn advance(&mut self) -> Result<PipelineStage, String> {
        let next = self
            .current_stage
            .next()
            .ok_or_else(|| format!("{} is already {}", self.name, self.current_stage))?;
        self.move_to(next)?;
        Ok(next)
    }
}
