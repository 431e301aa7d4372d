//! Splices externally observed readings into the live state.

use contracts::{CityState, ExternalReading};

use crate::fluctuation::clamp;

const RISK_BASELINE: f64 = 28.0;
const AIR_QUALITY_NEUTRAL: f64 = 50.0;
const AIR_QUALITY_TO_RISK: f64 = 0.1;

#[derive(Debug, Clone, PartialEq)]
pub struct OverrideOutcome {
    pub applied: Vec<&'static str>,
    pub pollution_risk_level: f64,
}

/// Overwrites the fields present in `reading`, then re-derives pollution risk
/// from a fixed baseline.
///
/// Temperature, humidity, and AQI readings of exactly zero are treated as
/// "no reading"; rainfall is taken whenever present, zero included.
pub fn apply_external_reading(state: &mut CityState, reading: &ExternalReading) -> OverrideOutcome {
    let mut applied = Vec::new();
    let env = &mut state.environment;

    if let Some(temperature) = observed(reading.temperature) {
        env.temperature = temperature;
        applied.push("temperature");
    }
    if let Some(humidity) = observed(reading.humidity) {
        env.humidity = humidity;
        applied.push("humidity");
    }
    if let Some(aqi) = observed(reading.aqi) {
        env.air_quality_index = aqi;
        applied.push("aqi");
    }
    if let Some(rainfall) = reading.rainfall.filter(|value| value.is_finite()) {
        env.rainfall = rainfall;
        applied.push("rainfall");
    }

    let pollution_change = env.air_quality_index - AIR_QUALITY_NEUTRAL;
    state.health.pollution_risk_level = clamp(
        RISK_BASELINE + pollution_change * AIR_QUALITY_TO_RISK,
        0.0,
        100.0,
    );

    OverrideOutcome {
        applied,
        pollution_risk_level: state.health.pollution_risk_level,
    }
}

fn observed(value: Option<f64>) -> Option<f64> {
    value.filter(|value| value.is_finite() && *value != 0.0)
}
