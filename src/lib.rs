pub mod config;
pub mod creature;
pub mod ecosystem;
pub mod engine;
pub mod error;
pub mod forest;
pub mod ids;
pub mod rng;
pub mod snapshot;
pub mod species;
pub mod systems;
pub mod world;

pub use config::{Scenario, ScenarioLoader};
pub use ecosystem::{EcoSystem, EcosystemSettings, PopulationPlan};
pub use engine::{CycleSummary, Engine, EngineSettings};
pub use error::{EcoError, Result};
