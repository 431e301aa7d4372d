use contracts::{CityState, Predictions};

use crate::fluctuation::round_half_up;

const DENSITY_BASELINE: f64 = 50.0;
const RAINFALL_BASELINE: f64 = 10.0;

/// Directional impact estimates derived purely from the current state.
pub fn recompute_predictions(state: &CityState) -> Predictions {
    let traffic_trend = (state.traffic.vehicle_density - DENSITY_BASELINE) / DENSITY_BASELINE;
    let rainfall_trend = (state.environment.rainfall - RAINFALL_BASELINE) / RAINFALL_BASELINE;

    Predictions {
        traffic_impact: impact(traffic_trend * 15.0),
        pollution_impact: impact(traffic_trend * 12.0),
        health_impact: impact(traffic_trend * 8.0),
        agriculture_impact: impact(rainfall_trend * -10.0),
    }
}

fn impact(value: f64) -> i32 {
    let rounded = round_half_up(value);
    if rounded.is_nan() {
        return 0;
    }
    rounded.clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::initial_city_state;

    #[test]
    fn seed_state_predictions() {
        let predictions = recompute_predictions(&initial_city_state());
        assert_eq!(
            predictions,
            Predictions {
                traffic_impact: 5,
                pollution_impact: 4,
                health_impact: 2,
                agriculture_impact: -2,
            }
        );
    }

    #[test]
    fn low_density_and_dry_weather_flip_signs() {
        let mut state = initial_city_state();
        state.traffic.vehicle_density = 25.0;
        state.environment.rainfall = 0.0;
        let predictions = recompute_predictions(&state);
        // trend -0.5: -7.5 rounds up to -7, -6, -4; rainfall trend -1 gives +10
        assert_eq!(predictions.traffic_impact, -7);
        assert_eq!(predictions.pollution_impact, -6);
        assert_eq!(predictions.health_impact, -4);
        assert_eq!(predictions.agriculture_impact, 10);
    }

    #[test]
    fn neutral_state_predicts_no_change() {
        let mut state = initial_city_state();
        state.traffic.vehicle_density = 50.0;
        state.environment.rainfall = 10.0;
        assert_eq!(recompute_predictions(&state), Predictions::default());
    }
}
