// Simulated "AI" demos. All analysis is a fixed delay followed by random scores
// in a fixed range; results are not deterministic across runs.

use std::ops::RangeInclusive;
use std::time::Duration;

use rand::Rng;

pub mod handlers;
pub mod interview;
pub mod resume;

pub const SCORE_RANGE: RangeInclusive<u8> = 70..=100;

#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Pause before a simulated result is produced.
    pub delay: Duration,
    pub score_range: RangeInclusive<u8>,
}

impl SimulationConfig {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            score_range: SCORE_RANGE,
        }
    }

    pub fn draw_score(&self) -> u8 {
        rand::thread_rng().gen_range(self.score_range.clone())
    }

    pub async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}
