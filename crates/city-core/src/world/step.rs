use super::*;

impl CityWorld {
    /// Number of completed ticks.
    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    pub fn status(&self) -> EngineStatus {
        EngineStatus {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            tick: self.tick,
            seed: self.config.seed,
            tick_interval_ms: self.config.tick_interval_ms,
        }
    }

    /// Advances the state by one step and refreshes predictions.
    pub fn tick(&mut self) {
        crate::fluctuation::advance(&mut self.state, self.noise.as_mut());
        self.tick = self.tick.saturating_add(1);

        debug!(
            tick = self.tick,
            vehicle_density = self.state.traffic.vehicle_density,
            air_quality_index = self.state.environment.air_quality_index,
            pollution_risk_level = self.state.health.pollution_risk_level,
            crop_yield_index = self.state.agriculture.crop_yield_index,
            "city state advanced"
        );
    }

    pub fn step_n(&mut self, n: u64) -> u64 {
        let mut committed = 0_u64;
        for _ in 0..n {
            self.tick();
            committed += 1;
        }
        committed
    }

    pub fn apply_external_reading(&mut self, reading: &ExternalReading) -> OverrideOutcome {
        let outcome = crate::realtime::apply_external_reading(&mut self.state, reading);
        info!(
            tick = self.tick,
            applied = ?outcome.applied,
            pollution_risk_level = outcome.pollution_risk_level,
            "external reading integrated"
        );
        outcome
    }
}
