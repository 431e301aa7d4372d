//! v1 cross-boundary contracts for the city engine, HTTP API, and dashboard.
//!
//! Field names on the wire are camelCase and must stay verbatim: the browser
//! dashboard binds to them directly.

use std::fmt;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

mod analytics;
mod city;
pub mod serde_u64_string;

pub use analytics::{
    AdjustedValues, Alert, AlertLevel, AlertModule, DashboardModules, DashboardView,
    ExternalReading, ModuleScore, ModuleStatus, ScenarioInputError, ScenarioInputs,
    ScenarioInsights, ScenarioRequest, ScenarioResult,
};
pub use city::{
    AgricultureMetrics, CityState, EnvironmentMetrics, HealthMetrics, Pollutants, Predictions,
    TrafficMetrics,
};

pub const SCHEMA_VERSION_V1: &str = "1.0";
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 5_000;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Fixed seed for the fluctuation noise; `None` draws from OS entropy.
    #[serde(default, with = "serde_u64_string")]
    pub seed: Option<u64>,
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

fn default_tick_interval_ms() -> u64 {
    DEFAULT_TICK_INTERVAL_MS
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
        }
    }
}

impl EngineConfig {
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EngineStatus {
    pub schema_version: String,
    pub tick: u64,
    #[serde(default, with = "serde_u64_string")]
    pub seed: Option<u64>,
    pub tick_interval_ms: u64,
}

impl fmt::Display for EngineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.seed {
            Some(seed) => write!(
                f,
                "tick={} seed={} interval_ms={}",
                self.tick, seed, self.tick_interval_ms
            ),
            None => write!(
                f,
                "tick={} seed=entropy interval_ms={}",
                self.tick, self.tick_interval_ms
            ),
        }
    }
}

/// A payload stamped with the wall-clock time it was read, flattened so the
/// timestamp sits beside the payload's own fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Stamped<T> {
    pub timestamp: String,
    #[serde(flatten)]
    pub body: T,
}

impl<T> Stamped<T> {
    pub fn now(body: T) -> Self {
        Self {
            timestamp: iso_timestamp(),
            body,
        }
    }
}

/// Current UTC time as ISO-8601 with millisecond precision and a `Z` suffix.
pub fn iso_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidScenario,
    InvalidReading,
    InternalError,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub schema_version: String,
    pub error_code: ErrorCode,
    #[serde(rename = "error")]
    pub message: String,
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(error_code: ErrorCode, message: impl Into<String>, details: Option<String>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            error_code,
            message: message.into(),
            details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn engine_config_accepts_string_or_missing_seed() {
        let parsed: EngineConfig =
            serde_json::from_str(r#"{"seed":"42","tickIntervalMs":250}"#).expect("config");
        assert_eq!(parsed.seed, Some(42));
        assert_eq!(parsed.tick_interval_ms, 250);

        let defaults: EngineConfig = serde_json::from_str("{}").expect("empty config");
        assert_eq!(defaults, EngineConfig::default());
    }

    #[test]
    fn stamped_flattens_body_beside_timestamp() {
        let stamped = Stamped::now(Predictions {
            traffic_impact: 5,
            pollution_impact: 4,
            health_impact: 2,
            agriculture_impact: -2,
        });
        let value = serde_json::to_value(&stamped).expect("serialize");
        assert_eq!(value["trafficImpact"], json!(5));
        assert_eq!(value["agricultureImpact"], json!(-2));
        let timestamp = value["timestamp"].as_str().expect("timestamp string");
        assert!(timestamp.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
    }

    #[test]
    fn api_error_uses_error_field_for_message() {
        let error = ApiError::new(ErrorCode::InvalidScenario, "Missing scenario parameters", None);
        let value = serde_json::to_value(&error).expect("serialize");
        assert_eq!(value["error"], json!("Missing scenario parameters"));
        assert_eq!(value["errorCode"], json!("INVALID_SCENARIO"));
    }
}
