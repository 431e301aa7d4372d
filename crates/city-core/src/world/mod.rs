use std::fmt;

use contracts::{
    AgricultureMetrics, CityState, DashboardView, EngineConfig, EngineStatus, EnvironmentMetrics,
    ExternalReading, HealthMetrics, Pollutants, Predictions, ScenarioInputs, ScenarioResult,
    TrafficMetrics, SCHEMA_VERSION_V1,
};
use tracing::{debug, info};

use crate::noise::{NoiseSource, RngNoise};
use crate::realtime::OverrideOutcome;

mod init;
mod snapshot;
mod step;

pub use init::initial_city_state;

/// Owner of the live city state and the only place it is mutated.
pub struct CityWorld {
    config: EngineConfig,
    state: CityState,
    noise: Box<dyn NoiseSource>,
    tick: u64,
}

impl fmt::Debug for CityWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CityWorld")
            .field("config", &self.config)
            .field("tick", &self.tick)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
