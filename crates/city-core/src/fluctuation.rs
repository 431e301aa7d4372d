//! Bounded random-walk update applied to the city state on every tick.

use contracts::CityState;

use crate::noise::NoiseSource;
use crate::predictions::recompute_predictions;

/// Percent range of a single draw plus the clamp band it lands in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub percent_range: f64,
    pub min: f64,
    pub max: f64,
}

impl Band {
    /// A percentage metric clamped to `[0, 100]`.
    pub const fn percent(percent_range: f64) -> Self {
        Self {
            percent_range,
            min: 0.0,
            max: 100.0,
        }
    }

    pub const fn within(percent_range: f64, min: f64, max: f64) -> Self {
        Self {
            percent_range,
            min,
            max,
        }
    }

    /// A free-running quantity: no ceiling, never below `min`.
    pub const fn at_least(percent_range: f64, min: f64) -> Self {
        Self::within(percent_range, min, f64::INFINITY)
    }
}

pub const COUPLING_BAND: Band = Band::percent(5.0);
/// Shared by the coupling's hypothetical draw and the committed walk.
pub const RAINFALL: Band = Band::at_least(10.0, 0.0);

pub const VEHICLE_DENSITY: Band = Band::percent(3.0);
pub const CONGESTION_LEVEL: Band = Band::percent(4.0);
pub const TRAFFIC_FLOW: Band = Band::percent(3.0);
pub const PUBLIC_TRANSPORT_USAGE: Band = Band::percent(3.0);
pub const AVERAGE_SPEED: Band = Band::within(3.0, 0.0, 120.0);
pub const TEMPERATURE: Band = Band::within(2.0, 15.0, 30.0);
pub const HUMIDITY: Band = Band::percent(5.0);
pub const ENERGY_CONSUMPTION: Band = Band::within(3.0, 7_000.0, 10_000.0);
pub const RENEWABLE_ENERGY: Band = Band::percent(2.0);
pub const CO2_LEVELS: Band = Band::at_least(5.0, 0.0);
pub const TRACE_POLLUTANT: Band = Band::at_least(2.0, 0.0);
pub const CARBON_MONOXIDE: Band = Band::at_least(10.0, 0.0);
pub const HOSPITAL_LOAD: Band = Band::percent(2.0);
pub const PUBLIC_HEALTH_INDEX: Band = Band::percent(2.0);
pub const VACCINATION_RATE: Band = Band::percent(2.0);
pub const AVERAGE_LIFE_EXPECTANCY: Band = Band::at_least(0.1, 0.0);
pub const FOOD_SUPPLY_STABILITY: Band = Band::percent(2.0);
pub const WATER_USAGE_EFFICIENCY: Band = Band::percent(3.0);
pub const SMART_IRRIGATION_COVERAGE: Band = Band::percent(2.0);
pub const LOCAL_FOOD_PRODUCTION: Band = Band::percent(2.0);
pub const FOOD_WASTE_PERCENTAGE: Band = Band::percent(2.0);

/// Half-open integer range for the respiratory case walk.
pub const RESPIRATORY_STEP: (i64, i64) = (-3, 3);
pub const ACCIDENT_STEP: (i64, i64) = (-1, 2);

const TRAFFIC_TO_AIR_QUALITY: f64 = 0.3;
const AIR_QUALITY_NEUTRAL: f64 = 50.0;
const AIR_QUALITY_TO_RISK: f64 = 0.1;
const RAINFALL_TO_CROP_YIELD: f64 = 0.5;

/// `clamp(round2(value + uniform(-range, range)), min, max)`.
pub fn fluctuate(noise: &mut dyn NoiseSource, value: f64, band: Band) -> f64 {
    let change = noise.offset(band.percent_range);
    clamp(round_to_hundredths(value + change), band.min, band.max)
}

/// Rounds half-way cases towards positive infinity (`-2.5` becomes `-2`).
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

pub fn round_to_hundredths(value: f64) -> f64 {
    round_half_up(value * 100.0) / 100.0
}

/// Saturating clamp that never panics on an inverted band.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.min(max).max(min)
}

/// Advances `state` by one tick: coupling rules first, then independent
/// perturbation, then the prediction refresh.
pub fn advance(state: &mut CityState, noise: &mut dyn NoiseSource) {
    apply_coupling(state, noise);
    apply_independent(state, noise);
    state.predictions = recompute_predictions(state);
}

fn apply_coupling(state: &mut CityState, noise: &mut dyn NoiseSource) {
    // Hypothetical draws are discarded; the independent pass below redraws.
    let density = state.traffic.vehicle_density;
    let traffic_change = fluctuate(noise, density, VEHICLE_DENSITY) - density;
    let env = &mut state.environment;
    env.air_quality_index = fluctuate(
        noise,
        env.air_quality_index - traffic_change * TRAFFIC_TO_AIR_QUALITY,
        COUPLING_BAND,
    );

    let pollution_change = env.air_quality_index - AIR_QUALITY_NEUTRAL;
    let health = &mut state.health;
    health.pollution_risk_level = fluctuate(
        noise,
        health.pollution_risk_level + pollution_change * AIR_QUALITY_TO_RISK,
        COUPLING_BAND,
    );

    let rainfall = env.rainfall;
    let rainfall_change = fluctuate(noise, rainfall, RAINFALL) - rainfall;
    let agri = &mut state.agriculture;
    agri.crop_yield_index = fluctuate(
        noise,
        agri.crop_yield_index - rainfall_change * RAINFALL_TO_CROP_YIELD,
        COUPLING_BAND,
    );
}

/// Every metric the coupling did not write gets its own draw. AQI, pollution
/// risk and crop yield were already perturbed by the coupling.
fn apply_independent(state: &mut CityState, noise: &mut dyn NoiseSource) {
    let traffic = &mut state.traffic;
    traffic.vehicle_density = fluctuate(noise, traffic.vehicle_density, VEHICLE_DENSITY);
    traffic.congestion_level = fluctuate(noise, traffic.congestion_level, CONGESTION_LEVEL);
    traffic.traffic_flow = fluctuate(noise, traffic.traffic_flow, TRAFFIC_FLOW);
    traffic.public_transport_usage =
        fluctuate(noise, traffic.public_transport_usage, PUBLIC_TRANSPORT_USAGE);
    traffic.average_speed = fluctuate(noise, traffic.average_speed, AVERAGE_SPEED);
    traffic.accidents_today = walk_count(noise, traffic.accidents_today, ACCIDENT_STEP);

    let env = &mut state.environment;
    env.temperature = fluctuate(noise, env.temperature, TEMPERATURE);
    env.humidity = fluctuate(noise, env.humidity, HUMIDITY);
    env.energy_consumption = fluctuate(noise, env.energy_consumption, ENERGY_CONSUMPTION);
    env.renewable_energy_percentage =
        fluctuate(noise, env.renewable_energy_percentage, RENEWABLE_ENERGY);
    env.co2_levels = fluctuate(noise, env.co2_levels, CO2_LEVELS);
    env.rainfall = fluctuate(noise, env.rainfall, RAINFALL);
    let pollutants = &mut env.pollutants;
    pollutants.no2 = fluctuate(noise, pollutants.no2, TRACE_POLLUTANT);
    pollutants.so2 = fluctuate(noise, pollutants.so2, TRACE_POLLUTANT);
    pollutants.pm2_5 = fluctuate(noise, pollutants.pm2_5, TRACE_POLLUTANT);
    pollutants.co = fluctuate(noise, pollutants.co, CARBON_MONOXIDE);
    pollutants.o3 = fluctuate(noise, pollutants.o3, TRACE_POLLUTANT);

    let health = &mut state.health;
    health.hospital_load = fluctuate(noise, health.hospital_load, HOSPITAL_LOAD);
    health.public_health_index = fluctuate(noise, health.public_health_index, PUBLIC_HEALTH_INDEX);
    health.vaccination_rate = fluctuate(noise, health.vaccination_rate, VACCINATION_RATE);
    health.average_life_expectancy = fluctuate(
        noise,
        health.average_life_expectancy,
        AVERAGE_LIFE_EXPECTANCY,
    );
    health.respiratory_cases = walk_count(noise, health.respiratory_cases, RESPIRATORY_STEP);

    let agri = &mut state.agriculture;
    agri.food_supply_stability =
        fluctuate(noise, agri.food_supply_stability, FOOD_SUPPLY_STABILITY);
    agri.water_usage_efficiency =
        fluctuate(noise, agri.water_usage_efficiency, WATER_USAGE_EFFICIENCY);
    agri.smart_irrigation_coverage =
        fluctuate(noise, agri.smart_irrigation_coverage, SMART_IRRIGATION_COVERAGE);
    agri.local_food_production =
        fluctuate(noise, agri.local_food_production, LOCAL_FOOD_PRODUCTION);
    agri.food_waste_percentage =
        fluctuate(noise, agri.food_waste_percentage, FOOD_WASTE_PERCENTAGE);
}

/// Integer walk over a half-open step range, floored at zero.
fn walk_count(noise: &mut dyn NoiseSource, count: u32, (low, high): (i64, i64)) -> u32 {
    let next = i64::from(count) + noise.step(low, high);
    u32::try_from(next.max(0)).unwrap_or(u32::MAX)
}
