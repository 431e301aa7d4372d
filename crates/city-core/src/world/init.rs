use super::*;

impl CityWorld {
    /// Seed-state world whose noise comes from `config.seed`, or from OS
    /// entropy when no seed is set.
    pub fn new(config: EngineConfig) -> Self {
        let noise: Box<dyn NoiseSource> = match config.seed {
            Some(seed) => Box::new(RngNoise::seeded(seed)),
            None => Box::new(RngNoise::from_entropy()),
        };
        Self::assemble(config, initial_city_state(), noise)
    }

    pub fn with_noise(config: EngineConfig, noise: impl NoiseSource + 'static) -> Self {
        Self::assemble(config, initial_city_state(), Box::new(noise))
    }

    /// Starts from an arbitrary state. Predictions are re-derived so the
    /// state's invariant holds from the first read.
    pub fn from_state(
        config: EngineConfig,
        mut state: CityState,
        noise: impl NoiseSource + 'static,
    ) -> Self {
        state.predictions = crate::predictions::recompute_predictions(&state);
        Self::assemble(config, state, Box::new(noise))
    }

    fn assemble(config: EngineConfig, state: CityState, noise: Box<dyn NoiseSource>) -> Self {
        Self {
            config,
            state,
            noise,
            tick: 0,
        }
    }
}

impl Default for CityWorld {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

pub fn initial_city_state() -> CityState {
    let mut state = CityState {
        traffic: TrafficMetrics {
            vehicle_density: 65.0,
            congestion_level: 42.0,
            traffic_flow: 78.0,
            public_transport_usage: 65.0,
            accidents_today: 3,
            average_speed: 45.0,
        },
        environment: EnvironmentMetrics {
            air_quality_index: 72.0,
            temperature: 22.0,
            humidity: 45.0,
            energy_consumption: 8_500.0,
            renewable_energy_percentage: 38.0,
            co2_levels: 420.0,
            rainfall: 12.0,
            pollutants: Pollutants {
                no2: 45.0,
                so2: 15.0,
                pm2_5: 35.0,
                co: 550.0,
                o3: 60.0,
            },
        },
        health: HealthMetrics {
            pollution_risk_level: 28.0,
            hospital_load: 65.0,
            respiratory_cases: 120,
            public_health_index: 82.0,
            vaccination_rate: 88.0,
            average_life_expectancy: 78.0,
        },
        agriculture: AgricultureMetrics {
            crop_yield_index: 75.0,
            food_supply_stability: 82.0,
            water_usage_efficiency: 68.0,
            smart_irrigation_coverage: 45.0,
            local_food_production: 72.0,
            food_waste_percentage: 18.0,
        },
        predictions: Predictions::default(),
    };
    state.predictions = crate::predictions::recompute_predictions(&state);
    state
}
