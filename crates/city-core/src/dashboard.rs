//! Per-domain scoring, status thresholds, and alert rules for the dashboard.

use contracts::{
    Alert, AlertLevel, AlertModule, CityState, DashboardModules, DashboardView, ModuleScore,
    ModuleStatus,
};

use crate::fluctuation::{clamp, round_half_up};

const DOMAIN_WEIGHT: f64 = 0.25;
const CO2_SCALE: f64 = 6.0;

/// Unrounded per-domain scores.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DomainScores {
    pub mobility: f64,
    pub environment: f64,
    pub health: f64,
    pub agriculture: f64,
}

impl DomainScores {
    pub fn from_state(state: &CityState) -> Self {
        let traffic = &state.traffic;
        let env = &state.environment;
        let health = &state.health;
        let agri = &state.agriculture;

        Self {
            mobility: (100.0 - traffic.congestion_level + traffic.traffic_flow) / 2.0,
            environment: (env.air_quality_index + (100.0 - env.co2_levels / CO2_SCALE)) / 2.0,
            health: (health.public_health_index + (100.0 - health.pollution_risk_level)) / 2.0,
            agriculture: (agri.crop_yield_index + agri.food_supply_stability) / 2.0,
        }
    }

    /// Equal-weight aggregate, rounded once at the end and held to `[0, 100]`.
    pub fn overall(&self) -> u32 {
        let weighted = self.mobility * DOMAIN_WEIGHT
            + self.environment * DOMAIN_WEIGHT
            + self.health * DOMAIN_WEIGHT
            + self.agriculture * DOMAIN_WEIGHT;
        bounded_score(weighted)
    }
}

/// Rounds half up and holds the result to `[0, 100]`; NaN scores as 0.
fn bounded_score(value: f64) -> u32 {
    let rounded = round_half_up(value);
    if rounded.is_nan() {
        return 0;
    }
    clamp(rounded, 0.0, 100.0) as u32
}

pub fn overall_city_health(state: &CityState) -> u32 {
    DomainScores::from_state(state).overall()
}

pub fn dashboard(state: &CityState) -> DashboardView {
    let scores = DomainScores::from_state(state);

    DashboardView {
        overall_city_health: scores.overall(),
        modules: modules(state, &scores),
        predictions: state.predictions,
        alerts: alerts(state),
    }
}

fn modules(state: &CityState, scores: &DomainScores) -> DashboardModules {
    let mobility = if state.traffic.congestion_level < 50.0 {
        ModuleStatus::Good
    } else {
        ModuleStatus::Moderate
    };
    let environment = if state.environment.air_quality_index > 70.0 {
        ModuleStatus::Good
    } else {
        ModuleStatus::NeedsAttention
    };
    let health = if state.health.hospital_load < 70.0 {
        ModuleStatus::Good
    } else {
        ModuleStatus::Moderate
    };
    let agriculture = if state.agriculture.food_supply_stability > 75.0 {
        ModuleStatus::Good
    } else {
        ModuleStatus::Stable
    };

    DashboardModules {
        mobility: module_score(scores.mobility, mobility),
        environment: module_score(scores.environment, environment),
        health: module_score(scores.health, health),
        agriculture: module_score(scores.agriculture, agriculture),
    }
}

fn module_score(score: f64, status: ModuleStatus) -> ModuleScore {
    ModuleScore {
        score: bounded_score(score),
        status,
    }
}

struct AlertRule {
    module: AlertModule,
    level: AlertLevel,
    message: &'static str,
    action: &'static str,
    triggered: fn(&CityState) -> bool,
}

const ALERT_RULES: [AlertRule; 4] = [
    AlertRule {
        module: AlertModule::Mobility,
        level: AlertLevel::Warning,
        message: "High traffic congestion detected",
        action: "Consider traffic diversion",
        triggered: congestion_high,
    },
    AlertRule {
        module: AlertModule::Environment,
        level: AlertLevel::Danger,
        message: "Poor air quality detected",
        action: "Activate pollution control measures",
        triggered: air_quality_poor,
    },
    AlertRule {
        module: AlertModule::Health,
        level: AlertLevel::Warning,
        message: "High hospital load",
        action: "Prepare additional resources",
        triggered: hospital_load_high,
    },
    AlertRule {
        module: AlertModule::Agriculture,
        level: AlertLevel::Warning,
        message: "Low crop yield predicted",
        action: "Review irrigation and fertilization",
        triggered: crop_yield_low,
    },
];

fn congestion_high(state: &CityState) -> bool {
    state.traffic.congestion_level > 60.0
}

fn air_quality_poor(state: &CityState) -> bool {
    state.environment.air_quality_index < 50.0
}

fn hospital_load_high(state: &CityState) -> bool {
    state.health.hospital_load > 80.0
}

fn crop_yield_low(state: &CityState) -> bool {
    state.agriculture.crop_yield_index < 60.0
}

/// Every matching alert, in mobility, environment, health, agriculture order.
pub fn alerts(state: &CityState) -> Vec<Alert> {
    ALERT_RULES
        .iter()
        .filter(|rule| (rule.triggered)(state))
        .map(|rule| Alert {
            level: rule.level,
            module: rule.module,
            message: rule.message.to_string(),
            action: rule.action.to_string(),
        })
        .collect()
}
