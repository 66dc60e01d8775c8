//! Stage controller: an array index with monotonic advance/retreat.
//!
//! Out-of-bounds moves are silent no-ops. There are no guards beyond the
//! bounds of the stage list and no rollback.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::workflow::registry::Stage;

/// Serialisable controller position, stored on process records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageCursor {
    pub current_step: u32,
    pub completed_steps: BTreeSet<u32>,
}

#[derive(Debug, Clone)]
pub struct StageController {
    stages: &'static [Stage],
    index: usize,
    completed: BTreeSet<u32>,
}

impl StageController {
    pub fn new(stages: &'static [Stage]) -> Self {
        Self {
            stages,
            index: 0,
            completed: BTreeSet::new(),
        }
    }

    /// Rebuilds a controller from a stored cursor. Unknown step ids fall back to the
    /// first stage and completed ids beyond the current step are dropped.
    pub fn restore(stages: &'static [Stage], cursor: &StageCursor) -> Self {
        let index = stages
            .iter()
            .position(|s| s.id == cursor.current_step)
            .unwrap_or(0);
        let current_id = stages.get(index).map(|s| s.id).unwrap_or(0);
        let completed = cursor
            .completed_steps
            .iter()
            .copied()
            .filter(|id| *id <= current_id && stages.iter().any(|s| s.id == *id))
            .collect();
        Self {
            stages,
            index,
            completed,
        }
    }

    /// Advances one stage and marks the prior stage completed.
    /// Returns false (and changes nothing) at the last stage.
    pub fn next(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.completed.insert(self.stages[self.index].id);
        self.index += 1;
        true
    }

    /// Steps back one stage. Returns false at the first stage.
    /// Completed ids above the new current stage are forgotten.
    pub fn previous(&mut self) -> bool {
        if self.is_first() {
            return false;
        }
        self.index -= 1;
        let current_id = self.stages[self.index].id;
        self.completed.retain(|id| *id <= current_id);
        true
    }

    pub fn current(&self) -> Option<&'static Stage> {
        self.stages.get(self.index)
    }

    pub fn current_index(&self) -> usize {
        self.index
    }

    pub fn completed(&self) -> &BTreeSet<u32> {
        &self.completed
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.stages.len()
    }

    /// Share of stages completed, 0 to 100.
    pub fn progress_percent(&self) -> f64 {
        if self.stages.is_empty() {
            return 0.0;
        }
        self.completed.len() as f64 / self.stages.len() as f64 * 100.0
    }

    pub fn cursor(&self) -> StageCursor {
        StageCursor {
            current_step: self.current().map(|s| s.id).unwrap_or(0),
            completed_steps: self.completed.clone(),
        }
    }
}
