use std::sync::Arc;

use crate::config::Config;
use crate::events::EventBus;
use crate::simulation::interview::InterviewRoom;
use crate::simulation::SimulationConfig;
use crate::store::{HrStore, MemoryStore};

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Each service is constructed once in `main` and handed in explicitly.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable record store. Default: MemoryStore; PgStore when DATABASE_URL is set.
    pub store: Arc<dyn HrStore>,
    pub events: EventBus,
    pub interviews: Arc<InterviewRoom>,
    pub simulation: SimulationConfig,
    pub config: Config,
}

impl AppState {
    pub fn new(store: Arc<dyn HrStore>, config: Config) -> Self {
        Self {
            store,
            events: EventBus::new(config.event_channel_capacity),
            interviews: Arc::new(InterviewRoom::new()),
            simulation: SimulationConfig::new(config.simulated_delay),
            config,
        }
    }

    /// Empty in-memory state with no simulated delay.
    pub fn in_memory() -> Self {
        let config = Config {
            simulated_delay: std::time::Duration::ZERO,
            ..Config::default()
        };
        Self::new(Arc::new(MemoryStore::new()), config)
    }
}
