//! City pulse simulation engine: bounded random-walk metrics, cross-domain
//! coupling, short-horizon predictions, what-if projection, and dashboard
//! aggregation over a single owned state.

pub mod dashboard;
pub mod fluctuation;
pub mod noise;
pub mod predictions;
pub mod realtime;
pub mod scenario;
pub mod world;

pub use noise::{NoiseSource, RngNoise, ScriptedNoise};
pub use realtime::OverrideOutcome;
pub use world::{initial_city_state, CityWorld};
