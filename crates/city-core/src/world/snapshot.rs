use super::*;

impl CityWorld {
    /// Independent deep copy of the live state.
    pub fn snapshot(&self) -> CityState {
        self.state.clone()
    }

    pub fn traffic(&self) -> TrafficMetrics {
        self.state.traffic.clone()
    }

    pub fn environment(&self) -> EnvironmentMetrics {
        self.state.environment.clone()
    }

    pub fn health(&self) -> HealthMetrics {
        self.state.health.clone()
    }

    pub fn agriculture(&self) -> AgricultureMetrics {
        self.state.agriculture.clone()
    }

    pub fn predictions(&self) -> Predictions {
        self.state.predictions
    }

    pub fn dashboard(&self) -> DashboardView {
        crate::dashboard::dashboard(&self.snapshot())
    }

    pub fn project(&self, inputs: ScenarioInputs) -> ScenarioResult {
        crate::scenario::project(&self.snapshot(), inputs)
    }
}
