//! What-if projection against a baseline snapshot. Never touches live state.

use contracts::{AdjustedValues, CityState, ScenarioInputs, ScenarioInsights, ScenarioResult};

const CONGESTION_PER_TRAFFIC: f64 = 0.8;
const AIR_QUALITY_PER_TRAFFIC: f64 = 0.6;
const CROP_YIELD_PER_RAINFALL: f64 = 1.2;
const WATER_EFFICIENCY_PER_RAINFALL: f64 = 0.5;
const POLLUTION_PER_ENERGY: f64 = 0.4;
const HEALTH_RISK_PER_ENERGY: f64 = 0.3;

pub const SCENARIO_MESSAGE: &str = "Scenario Analysis Complete";

pub const RECOMMENDATIONS: [&str; 3] = [
    "Consider promoting public transport to reduce traffic impact",
    "Implement smart irrigation to mitigate rainfall effects",
    "Increase renewable energy sources to balance energy demand",
];

pub fn project(baseline: &CityState, inputs: ScenarioInputs) -> ScenarioResult {
    let adjusted = adjust(baseline, inputs);
    let predictions = insights(baseline, inputs, &adjusted);

    ScenarioResult {
        original: baseline.clone(),
        adjusted,
        predictions,
    }
}

pub fn adjust(baseline: &CityState, inputs: ScenarioInputs) -> AdjustedValues {
    let ScenarioInputs {
        traffic_increase,
        rainfall_decrease,
        energy_increase,
    } = inputs;
    let risk = baseline.health.pollution_risk_level;

    AdjustedValues {
        traffic_congestion: (baseline.traffic.congestion_level
            + traffic_increase * CONGESTION_PER_TRAFFIC)
            .min(100.0),
        air_quality: (baseline.environment.air_quality_index
            - traffic_increase * AIR_QUALITY_PER_TRAFFIC)
            .max(0.0),
        energy_use: baseline.environment.energy_consumption * (1.0 + energy_increase / 100.0),
        crop_yield: (baseline.agriculture.crop_yield_index
            - rainfall_decrease * CROP_YIELD_PER_RAINFALL)
            .max(0.0),
        water_efficiency: (baseline.agriculture.water_usage_efficiency
            - rainfall_decrease * WATER_EFFICIENCY_PER_RAINFALL)
            .max(0.0),
        pollution: (risk + energy_increase * POLLUTION_PER_ENERGY).max(0.0),
        health_risk: (risk + energy_increase * HEALTH_RISK_PER_ENERGY).min(100.0),
    }
}

fn insights(
    baseline: &CityState,
    inputs: ScenarioInputs,
    adjusted: &AdjustedValues,
) -> ScenarioInsights {
    let yield_loss = baseline.agriculture.crop_yield_index - adjusted.crop_yield;
    let risk_rise = adjusted.pollution - baseline.health.pollution_risk_level;

    ScenarioInsights {
        message: SCENARIO_MESSAGE.to_string(),
        insights: vec![
            format!(
                "If traffic increases by {}%, congestion will increase to {:.1}%",
                inputs.traffic_increase, adjusted.traffic_congestion
            ),
            format!(
                "Reducing rainfall by {}% could decrease crop yield by {:.1}%",
                inputs.rainfall_decrease, yield_loss
            ),
            format!(
                "Energy increase of {}% may raise pollution risk by {:.1}%",
                inputs.energy_increase, risk_rise
            ),
        ],
        recommendations: RECOMMENDATIONS.iter().map(|line| line.to_string()).collect(),
    }
}
