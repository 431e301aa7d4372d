//! The live city metrics model and its domain blocks.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CityState {
    pub traffic: TrafficMetrics,
    pub environment: EnvironmentMetrics,
    pub health: HealthMetrics,
    pub agriculture: AgricultureMetrics,
    pub predictions: Predictions,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrafficMetrics {
    pub vehicle_density: f64,
    pub congestion_level: f64,
    pub traffic_flow: f64,
    pub public_transport_usage: f64,
    pub accidents_today: u32,
    pub average_speed: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentMetrics {
    pub air_quality_index: f64,
    /// Degrees Celsius.
    pub temperature: f64,
    pub humidity: f64,
    /// kWh.
    pub energy_consumption: f64,
    pub renewable_energy_percentage: f64,
    /// ppm.
    pub co2_levels: f64,
    /// mm.
    pub rainfall: f64,
    pub pollutants: Pollutants,
}

/// Pollutant concentrations; free-running, never clamped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Pollutants {
    pub no2: f64,
    pub so2: f64,
    pub pm2_5: f64,
    pub co: f64,
    pub o3: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HealthMetrics {
    pub pollution_risk_level: f64,
    pub hospital_load: f64,
    pub respiratory_cases: u32,
    pub public_health_index: f64,
    pub vaccination_rate: f64,
    pub average_life_expectancy: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AgricultureMetrics {
    pub crop_yield_index: f64,
    pub food_supply_stability: f64,
    pub water_usage_efficiency: f64,
    pub smart_irrigation_coverage: f64,
    pub local_food_production: f64,
    pub food_waste_percentage: f64,
}

/// Signed short-horizon impact estimates, derived from the state every tick.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Predictions {
    pub traffic_impact: i32,
    pub pollution_impact: i32,
    pub health_impact: i32,
    pub agriculture_impact: i32,
}
