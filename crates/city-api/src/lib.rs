//! In-process API facade over the city engine, plus the HTTP server and the
//! optional Open-Meteo live feed that drive it.

mod feed;
mod server;

use city_core::{CityWorld, OverrideOutcome};
use contracts::{
    AgricultureMetrics, ApiError, CityState, DashboardView, EngineConfig, EngineStatus,
    EnvironmentMetrics, ErrorCode, ExternalReading, HealthMetrics, ScenarioInputError,
    ScenarioRequest, ScenarioResult, Stamped, TrafficMetrics,
};
use serde::Serialize;
use tracing::{debug, info};

pub use feed::{
    FeedConfig, FeedError, OpenMeteoFeed, DEFAULT_FEED_INTERVAL_SECS, DEFAULT_LATITUDE,
    DEFAULT_LONGITUDE,
};
pub use server::{serve, serve_on, ServerConfig, ServerError};

#[derive(Debug)]
pub struct CityApi {
    world: CityWorld,
    last_tick_at: Option<String>,
    last_reading: Option<Stamped<ExternalReading>>,
}

/// Engine status plus when the world last moved and what it last ingested.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApiStatus {
    #[serde(flatten)]
    pub engine: EngineStatus,
    pub last_tick_at: Option<String>,
    pub last_reading: Option<Stamped<ExternalReading>>,
}

/// What one tick produced, ready to be pushed to stream subscribers.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    pub timestamp: String,
    pub dashboard: DashboardView,
}

impl CityApi {
    pub fn from_config(config: EngineConfig) -> Self {
        Self::from_world(CityWorld::new(config))
    }

    pub fn from_world(world: CityWorld) -> Self {
        Self {
            world,
            last_tick_at: None,
            last_reading: None,
        }
    }

    pub fn world(&self) -> &CityWorld {
        &self.world
    }

    pub fn status(&self) -> ApiStatus {
        ApiStatus {
            engine: self.world.status(),
            last_tick_at: self.last_tick_at.clone(),
            last_reading: self.last_reading.clone(),
        }
    }

    pub fn tick(&mut self) -> TickReport {
        self.world.tick();
        let stamped = Stamped::now(self.world.dashboard());
        self.last_tick_at = Some(stamped.timestamp.clone());
        debug!(
            tick = self.world.current_tick(),
            overall = stamped.body.overall_city_health,
            "city tick published"
        );

        TickReport {
            tick: self.world.current_tick(),
            timestamp: stamped.timestamp,
            dashboard: stamped.body,
        }
    }

    pub fn step(&mut self, steps: u64) -> u64 {
        for _ in 0..steps {
            self.tick();
        }
        self.world.current_tick()
    }

    pub fn snapshot(&self) -> Stamped<CityState> {
        Stamped::now(self.world.snapshot())
    }

    pub fn traffic(&self) -> Stamped<TrafficMetrics> {
        Stamped::now(self.world.traffic())
    }

    pub fn environment(&self) -> Stamped<EnvironmentMetrics> {
        Stamped::now(self.world.environment())
    }

    pub fn health(&self) -> Stamped<HealthMetrics> {
        Stamped::now(self.world.health())
    }

    pub fn agriculture(&self) -> Stamped<AgricultureMetrics> {
        Stamped::now(self.world.agriculture())
    }

    pub fn dashboard(&self) -> Stamped<DashboardView> {
        Stamped::now(self.world.dashboard())
    }

    /// Projects a what-if request against the current snapshot.
    pub fn run_scenario(&self, request: ScenarioRequest) -> Result<ScenarioResult, ApiError> {
        let inputs = request.into_inputs().map_err(scenario_error)?;
        info!(
            traffic_increase = inputs.traffic_increase,
            rainfall_decrease = inputs.rainfall_decrease,
            energy_increase = inputs.energy_increase,
            tick = self.world.current_tick(),
            "scenario projected"
        );
        Ok(self.world.project(inputs))
    }

    /// Applies an external reading. A reading that carries no field at all is
    /// rejected rather than silently resetting pollution risk.
    pub fn ingest(&mut self, reading: ExternalReading) -> Result<OverrideOutcome, ApiError> {
        if reading.is_empty() {
            return Err(ApiError::new(
                ErrorCode::InvalidReading,
                "reading must carry at least one of temperature, humidity, aqi, rainfall",
                None,
            ));
        }
        if let Some(field) = non_finite_field(&reading) {
            return Err(ApiError::new(
                ErrorCode::InvalidReading,
                "reading values must be finite numbers",
                Some(format!("field={field}")),
            ));
        }

        let outcome = self.world.apply_external_reading(&reading);
        self.last_reading = Some(Stamped::now(reading));
        Ok(outcome)
    }
}

fn scenario_error(err: ScenarioInputError) -> ApiError {
    let details = match &err {
        ScenarioInputError::Missing(fields) => Some(format!("missing={}", fields.join(","))),
        ScenarioInputError::OutOfRange { field, value } => Some(format!("{field}={value}")),
    };
    ApiError::new(ErrorCode::InvalidScenario, err.to_string(), details)
}

fn non_finite_field(reading: &ExternalReading) -> Option<&'static str> {
    [
        ("temperature", reading.temperature),
        ("humidity", reading.humidity),
        ("aqi", reading.aqi),
        ("rainfall", reading.rainfall),
    ]
    .into_iter()
    .find(|(_, value)| value.is_some_and(|value| !value.is_finite()))
    .map(|(field, _)| field)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> CityApi {
        CityApi::from_config(EngineConfig::seeded(11))
    }

    #[test]
    fn tick_report_tracks_world_tick() {
        let mut api = seeded();
        let report = api.tick();
        assert_eq!(report.tick, 1);
        assert_eq!(api.status().engine.tick, 1);
        assert_eq!(api.status().last_tick_at, Some(report.timestamp));
        assert_eq!(api.step(4), 5);
    }

    #[test]
    fn scenario_missing_field_maps_to_invalid_scenario() {
        let api = seeded();
        let err = api
            .run_scenario(ScenarioRequest {
                traffic_increase: Some(10.0),
                rainfall_decrease: None,
                energy_increase: Some(5.0),
            })
            .expect_err("incomplete request must fail");
        assert_eq!(err.error_code, ErrorCode::InvalidScenario);
        assert_eq!(err.message, "Missing scenario parameters");
        assert_eq!(err.details.as_deref(), Some("missing=rainfallDecrease"));
    }

    #[test]
    fn negative_scenario_input_is_rejected() {
        let api = seeded();
        let err = api
            .run_scenario(ScenarioRequest {
                traffic_increase: Some(-1.0),
                rainfall_decrease: Some(0.0),
                energy_increase: Some(0.0),
            })
            .expect_err("negative percentage must fail");
        assert_eq!(err.error_code, ErrorCode::InvalidScenario);
        assert_eq!(err.details.as_deref(), Some("trafficIncrease=-1"));
    }

    #[test]
    fn ingest_records_last_reading() {
        let mut api = seeded();
        let outcome = api
            .ingest(ExternalReading {
                aqi: Some(30.0),
                ..ExternalReading::default()
            })
            .expect("reading applies");
        assert_eq!(outcome.pollution_risk_level, 26.0);
        let status = api.status();
        let last = status.last_reading.expect("reading recorded");
        assert_eq!(last.body.aqi, Some(30.0));
    }

    #[test]
    fn empty_or_non_finite_reading_is_rejected() {
        let mut api = seeded();
        let before = api.world().snapshot();

        let err = api
            .ingest(ExternalReading::default())
            .expect_err("empty reading must fail");
        assert_eq!(err.error_code, ErrorCode::InvalidReading);

        let err = api
            .ingest(ExternalReading {
                humidity: Some(f64::INFINITY),
                ..ExternalReading::default()
            })
            .expect_err("non-finite reading must fail");
        assert_eq!(err.details.as_deref(), Some("field=humidity"));

        assert_eq!(api.world().snapshot(), before);
        assert!(api.status().last_reading.is_none());
    }

    #[test]
    fn status_flattens_engine_fields() {
        let api = seeded();
        let value = serde_json::to_value(api.status()).expect("serialize status");
        assert_eq!(value["tick"], 0);
        assert_eq!(value["seed"], "11");
        assert_eq!(value["schemaVersion"], "1.0");
        assert!(value["lastTickAt"].is_null());
    }
}
