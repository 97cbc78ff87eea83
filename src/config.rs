//! YAML scenario files describing a forest to grow.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::{
    ecosystem::{EcoSystem, EcosystemSettings, PopulationPlan},
    engine::EngineSettings,
    systems::DEFAULT_CATASTROPHE_ODDS,
};

fn default_worm_interval() -> u32 {
    5
}

fn default_catastrophe_odds() -> u32 {
    DEFAULT_CATASTROPHE_ODDS
}

fn default_cycles() -> u64 {
    100
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub description: Option<String>,
    pub seed: u64,
    #[serde(default)]
    pub cycles: Option<u64>,
    #[serde(default)]
    pub forest: ForestConfig,
    #[serde(default = "default_worm_interval")]
    pub deadly_worm_sleep_interval: u32,
    #[serde(default = "default_catastrophe_odds")]
    pub catastrophe_odds: u32,
    #[serde(default)]
    pub population: PopulationPlan,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForestConfig {
    pub vertical_length: usize,
    pub horizontal_length: usize,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            vertical_length: 7,
            horizontal_length: 7,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        let scenario: Scenario = serde_yaml::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(scenario)
    }
}

impl Scenario {
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            seed: self.seed,
            catastrophe_odds: self.catastrophe_odds,
        }
    }

    pub fn ecosystem_settings(&self) -> EcosystemSettings {
        EcosystemSettings {
            vertical_length: self.forest.vertical_length,
            horizontal_length: self.forest.horizontal_length,
            deadly_worm_sleep_interval: self.deadly_worm_sleep_interval,
            engine: self.engine_settings(),
        }
    }

    pub fn build_ecosystem(&self) -> Result<EcoSystem> {
        EcoSystem::new(self.ecosystem_settings(), &self.population)
            .with_context(|| format!("Failed to build scenario '{}'", self.name))
    }

    pub fn cycles(&self, override_cycles: Option<u64>) -> u64 {
        override_cycles.or(self.cycles).unwrap_or_else(default_cycles)
    }
}
