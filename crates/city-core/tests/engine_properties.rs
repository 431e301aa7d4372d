use city_core::dashboard::{dashboard, overall_city_health};
use city_core::fluctuation::{fluctuate, Band};
use city_core::predictions::recompute_predictions;
use city_core::{initial_city_state, CityWorld, RngNoise, ScriptedNoise};
use contracts::{CityState, EngineConfig, ExternalReading, ScenarioInputs};
use proptest::prelude::*;

fn percentages(state: &CityState) -> Vec<(&'static str, f64)> {
    vec![
        ("vehicleDensity", state.traffic.vehicle_density),
        ("congestionLevel", state.traffic.congestion_level),
        ("trafficFlow", state.traffic.traffic_flow),
        ("publicTransportUsage", state.traffic.public_transport_usage),
        ("airQualityIndex", state.environment.air_quality_index),
        ("humidity", state.environment.humidity),
        (
            "renewableEnergyPercentage",
            state.environment.renewable_energy_percentage,
        ),
        ("pollutionRiskLevel", state.health.pollution_risk_level),
        ("hospitalLoad", state.health.hospital_load),
        ("publicHealthIndex", state.health.public_health_index),
        ("vaccinationRate", state.health.vaccination_rate),
        ("cropYieldIndex", state.agriculture.crop_yield_index),
        ("foodSupplyStability", state.agriculture.food_supply_stability),
        ("waterUsageEfficiency", state.agriculture.water_usage_efficiency),
        (
            "smartIrrigationCoverage",
            state.agriculture.smart_irrigation_coverage,
        ),
        ("localFoodProduction", state.agriculture.local_food_production),
        ("foodWastePercentage", state.agriculture.food_waste_percentage),
    ]
}

#[test]
fn long_run_keeps_every_band() {
    let mut world = CityWorld::new(EngineConfig::seeded(2024));
    for _ in 0..2_000 {
        world.tick();
        let state = world.snapshot();
        for (name, value) in percentages(&state) {
            assert!((0.0..=100.0).contains(&value), "{name} escaped: {value}");
        }
        let env = &state.environment;
        assert!((15.0..=30.0).contains(&env.temperature));
        assert!((7_000.0..=10_000.0).contains(&env.energy_consumption));
        assert!((0.0..=120.0).contains(&state.traffic.average_speed));
        let floored = [
            env.co2_levels,
            env.rainfall,
            env.pollutants.no2,
            env.pollutants.so2,
            env.pollutants.pm2_5,
            env.pollutants.co,
            env.pollutants.o3,
            state.health.average_life_expectancy,
        ];
        assert!(floored.iter().all(|value| *value >= 0.0), "{floored:?}");
        assert_eq!(state.predictions, recompute_predictions(&state));
    }
    assert_eq!(world.current_tick(), 2_000);
}

#[test]
fn saturating_noise_pins_percentages_to_their_bounds() {
    let mut up = CityWorld::with_noise(EngineConfig::default(), ScriptedNoise::constant(1.0, 2));
    let mut down =
        CityWorld::with_noise(EngineConfig::default(), ScriptedNoise::constant(-1.0, -3));
    // 500 ticks of +/-3 carry energy from 8500 to either end of its band
    up.step_n(600);
    down.step_n(600);

    let high = up.snapshot();
    assert_eq!(high.traffic.congestion_level, 100.0);
    assert_eq!(high.environment.temperature, 30.0);
    assert_eq!(high.environment.energy_consumption, 10_000.0);
    assert_eq!(high.traffic.average_speed, 120.0);
    assert_eq!(high.health.vaccination_rate, 100.0);
    assert_eq!(high.traffic.accidents_today, 603);

    let low = down.snapshot();
    assert_eq!(low.traffic.congestion_level, 0.0);
    assert_eq!(low.environment.temperature, 15.0);
    assert_eq!(low.environment.energy_consumption, 7_000.0);
    assert_eq!(low.health.respiratory_cases, 0);
    assert_eq!(low.traffic.accidents_today, 0);
    assert_eq!(low.traffic.average_speed, 0.0);
    assert_eq!(low.health.vaccination_rate, 0.0);
    assert_eq!(low.environment.pollutants.so2, 0.0);
    assert_eq!(low.environment.rainfall, 0.0);
}

#[test]
fn aqi_override_resets_pollution_risk() {
    let mut world = CityWorld::new(EngineConfig::seeded(5));
    world.step_n(7);
    let outcome = world.apply_external_reading(&ExternalReading {
        aqi: Some(30.0),
        ..ExternalReading::default()
    });
    assert_eq!(world.snapshot().environment.air_quality_index, 30.0);
    assert_eq!(world.snapshot().health.pollution_risk_level, 26.0);
    assert_eq!(outcome.applied, vec!["aqi"]);
}

#[test]
fn seed_state_scenario_projection() {
    let world = CityWorld::new(EngineConfig::seeded(0));
    let result = world.project(ScenarioInputs {
        traffic_increase: 20.0,
        rainfall_decrease: 10.0,
        energy_increase: 15.0,
    });
    let adjusted = serde_json::to_value(result.adjusted).expect("serialize adjusted");
    let close = |key: &str, expected: f64| {
        let actual = adjusted[key].as_f64().expect("numeric field");
        assert!((actual - expected).abs() < 1e-9, "{key}: {actual} != {expected}");
    };
    close("trafficCongestion", 58.0);
    close("airQuality", 60.0);
    close("cropYield", 63.0);
    close("waterEfficiency", 63.0);
    close("pollution", 34.0);
    close("healthRisk", 32.5);
    close("energyUse", 9_775.0);
}

proptest! {
    #[test]
    fn fluctuate_stays_in_band_and_near_input(
        seed in any::<u64>(),
        pct in 0.01_f64..10.0,
        lo in -50.0_f64..50.0,
        width in 0.0_f64..500.0,
        t in 0.0_f64..=1.0,
    ) {
        let hi = lo + width;
        let value = lo + width * t;
        let mut noise = RngNoise::seeded(seed);
        let result = fluctuate(&mut noise, value, Band::within(pct, lo, hi));
        prop_assert!(result >= lo && result <= hi);
        prop_assert!((result - value).abs() <= pct + 0.005 + 1e-9);
    }

    #[test]
    fn predictions_are_deterministic(density in 0.0_f64..=100.0, rainfall in 0.0_f64..200.0) {
        let mut state = initial_city_state();
        state.traffic.vehicle_density = density;
        state.environment.rainfall = rainfall;
        prop_assert_eq!(recompute_predictions(&state), recompute_predictions(&state.clone()));
    }

    #[test]
    fn overall_health_is_a_bounded_integer(
        congestion in 0.0_f64..=100.0,
        flow in 0.0_f64..=100.0,
        aqi in 0.0_f64..=100.0,
        co2 in 0.0_f64..=600.0,
        public_health in 0.0_f64..=100.0,
        risk in 0.0_f64..=100.0,
        crop in 0.0_f64..=100.0,
        supply in 0.0_f64..=100.0,
    ) {
        let mut state = initial_city_state();
        state.traffic.congestion_level = congestion;
        state.traffic.traffic_flow = flow;
        state.environment.air_quality_index = aqi;
        state.environment.co2_levels = co2;
        state.health.public_health_index = public_health;
        state.health.pollution_risk_level = risk;
        state.agriculture.crop_yield_index = crop;
        state.agriculture.food_supply_stability = supply;

        let overall = overall_city_health(&state);
        prop_assert!(overall <= 100);
        prop_assert_eq!(dashboard(&state).overall_city_health, overall);
    }

    #[test]
    fn projection_never_mutates_the_world(
        seed in any::<u64>(),
        ticks in 0_u64..40,
        traffic in 0.0_f64..200.0,
        rainfall in 0.0_f64..200.0,
        energy in 0.0_f64..200.0,
    ) {
        let mut world = CityWorld::new(EngineConfig::seeded(seed));
        world.step_n(ticks);
        let before = world.snapshot();
        let _ = world.project(ScenarioInputs {
            traffic_increase: traffic,
            rainfall_decrease: rainfall,
            energy_increase: energy,
        });
        let _ = world.dashboard();
        prop_assert_eq!(world.snapshot(), before);
    }

    #[test]
    fn seeded_worlds_replay_identically(seed in any::<u64>(), ticks in 1_u64..60) {
        let mut a = CityWorld::new(EngineConfig::seeded(seed));
        let mut b = CityWorld::new(EngineConfig::seeded(seed));
        a.step_n(ticks);
        b.step_n(ticks);
        prop_assert_eq!(a.snapshot(), b.snapshot());
    }
}
