//! Derived views: dashboard aggregation, scenario projection, and live readings.

use serde::{Deserialize, Serialize};

use crate::{CityState, Predictions};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub overall_city_health: u32,
    pub modules: DashboardModules,
    pub predictions: Predictions,
    pub alerts: Vec<Alert>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DashboardModules {
    pub mobility: ModuleScore,
    pub environment: ModuleScore,
    pub health: ModuleScore,
    pub agriculture: ModuleScore,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModuleScore {
    /// Held to `[0, 100]` like `overall_city_health`.
    pub score: u32,
    pub status: ModuleStatus,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ModuleStatus {
    Good,
    Moderate,
    #[serde(rename = "Needs Attention")]
    NeedsAttention,
    Stable,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Warning,
    Danger,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AlertModule {
    Mobility,
    Environment,
    Health,
    Agriculture,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Alert {
    #[serde(rename = "type")]
    pub level: AlertLevel,
    pub module: AlertModule,
    pub message: String,
    pub action: String,
}

/// Raw what-if request as posted by the dashboard. Every field is required;
/// absence is only representable so the boundary can report it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioRequest {
    pub traffic_increase: Option<f64>,
    pub rainfall_decrease: Option<f64>,
    pub energy_increase: Option<f64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioInputs {
    pub traffic_increase: f64,
    pub rainfall_decrease: f64,
    pub energy_increase: f64,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScenarioInputError {
    #[error("Missing scenario parameters")]
    Missing(Vec<&'static str>),
    #[error("scenario parameter {field} must be a finite, non-negative percentage (got {value})")]
    OutOfRange { field: &'static str, value: f64 },
}

impl ScenarioRequest {
    pub fn into_inputs(self) -> Result<ScenarioInputs, ScenarioInputError> {
        let missing = [
            ("trafficIncrease", self.traffic_increase),
            ("rainfallDecrease", self.rainfall_decrease),
            ("energyIncrease", self.energy_increase),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(field, _)| field)
        .collect::<Vec<_>>();
        if !missing.is_empty() {
            return Err(ScenarioInputError::Missing(missing));
        }

        let inputs = ScenarioInputs {
            traffic_increase: self.traffic_increase.unwrap_or_default(),
            rainfall_decrease: self.rainfall_decrease.unwrap_or_default(),
            energy_increase: self.energy_increase.unwrap_or_default(),
        };
        inputs.validate()?;
        Ok(inputs)
    }
}

impl ScenarioInputs {
    pub fn validate(&self) -> Result<(), ScenarioInputError> {
        for (field, value) in [
            ("trafficIncrease", self.traffic_increase),
            ("rainfallDecrease", self.rainfall_decrease),
            ("energyIncrease", self.energy_increase),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ScenarioInputError::OutOfRange { field, value });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScenarioResult {
    pub original: CityState,
    pub adjusted: AdjustedValues,
    pub predictions: ScenarioInsights,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdjustedValues {
    pub traffic_congestion: f64,
    pub air_quality: f64,
    pub energy_use: f64,
    pub crop_yield: f64,
    pub water_efficiency: f64,
    pub pollution: f64,
    pub health_risk: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScenarioInsights {
    pub message: String,
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Externally observed environment readings; any subset may be present.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct ExternalReading {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aqi: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rainfall: Option<f64>,
}

impl ExternalReading {
    pub fn is_empty(&self) -> bool {
        self.temperature.is_none()
            && self.humidity.is_none()
            && self.aqi.is_none()
            && self.rainfall.is_none()
    }
}
