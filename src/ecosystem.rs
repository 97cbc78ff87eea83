//! The operational surface front ends drive: build, cycle, stock, inspect, save and load.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::creature::{Creature, CreatureStats};
use crate::engine::{CycleSummary, Engine, EngineSettings};
use crate::error::Result;
use crate::forest::Position;
use crate::ids::IdRegistry;
use crate::rng::RngExt;
use crate::snapshot::SaveDocument;
use crate::species::Species;
use crate::world::{Census, World};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EcosystemSettings {
    pub vertical_length: usize,
    pub horizontal_length: usize,
    pub deadly_worm_sleep_interval: u32,
    pub engine: EngineSettings,
}

impl Default for EcosystemSettings {
    fn default() -> Self {
        Self {
            vertical_length: 7,
            horizontal_length: 7,
            deadly_worm_sleep_interval: 5,
            engine: EngineSettings::default(),
        }
    }
}

/// How many creatures of each species are scattered over a new forest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationPlan {
    pub blueberry: usize,
    pub hazel: usize,
    pub maple: usize,
    pub boar: usize,
    pub elk: usize,
    pub wolf: usize,
    pub bear: usize,
}

impl PopulationPlan {
    pub fn empty() -> Self {
        Self {
            blueberry: 0,
            hazel: 0,
            maple: 0,
            boar: 0,
            elk: 0,
            wolf: 0,
            bear: 0,
        }
    }

    pub fn amount(&self, species: Species) -> usize {
        match species {
            Species::Blueberry => self.blueberry,
            Species::Hazel => self.hazel,
            Species::Maple => self.maple,
            Species::Boar => self.boar,
            Species::Elk => self.elk,
            Species::Wolf => self.wolf,
            Species::Bear => self.bear,
        }
    }

    pub fn total(&self) -> usize {
        Species::ALL.into_iter().map(|s| self.amount(s)).sum()
    }
}

impl Default for PopulationPlan {
    fn default() -> Self {
        Self {
            blueberry: 20,
            hazel: 10,
            maple: 10,
            boar: 12,
            elk: 6,
            wolf: 12,
            bear: 6,
        }
    }
}

pub struct EcoSystem {
    world: World,
    engine: Engine,
}

impl EcoSystem {
    /// A fresh forest with every planned creature dropped on a random hectare.
    pub fn new(settings: EcosystemSettings, population: &PopulationPlan) -> Result<Self> {
        let mut world = World::new(
            settings.vertical_length,
            settings.horizontal_length,
            settings.deadly_worm_sleep_interval,
        )?;
        let mut engine = Engine::standard(settings.engine);
        let mut rng = engine.stream("population");
        let (rows, cols) = world.forest().bounds();
        for species in Species::ALL {
            for _ in 0..population.amount(species) {
                let cell = Position::new(
                    rng.randint(0, rows as i64 - 1) as usize,
                    rng.randint(0, cols as i64 - 1) as usize,
                );
                world.fill_creatures(species.name(), 1, cell, &mut rng)?;
            }
        }
        info!(
            rows,
            cols,
            creatures = world.forest().creature_count(),
            "ecosystem created"
        );
        Ok(Self { world, engine })
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn cycle(&mut self) -> Result<CycleSummary> {
        self.engine.cycle(&mut self.world)
    }

    pub fn cycles_run(&self) -> u64 {
        self.engine.cycles_run()
    }

    pub fn apocalypse(&mut self) -> usize {
        self.world.apocalypse()
    }

    pub fn fill_creatures(
        &mut self,
        species: &str,
        amount: usize,
        cell: (usize, usize),
    ) -> Result<Vec<String>> {
        let mut rng = self.engine.stream("population");
        self.world
            .fill_creatures(species, amount, cell.into(), &mut rng)
    }

    pub fn remove_creature(&mut self, id: &str) -> Result<Creature> {
        self.world.remove_creature(id)
    }

    pub fn creature_stats(&self, id: &str) -> Result<CreatureStats> {
        self.world.creature_stats(id)
    }

    pub fn census(&self) -> Census {
        self.world.census()
    }

    pub fn is_wasteland(&self) -> bool {
        self.world.is_wasteland()
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        SaveDocument::capture(&self.world).write(path)
    }

    /// Load a saved ecosystem with default engine settings and fresh id counters.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_with_settings(path, EngineSettings::default())
    }

    pub fn load_with_settings(path: impl AsRef<Path>, settings: EngineSettings) -> Result<Self> {
        let world = SaveDocument::read(path)?.restore(IdRegistry::new())?;
        Ok(Self {
            world,
            engine: Engine::standard(settings),
        })
    }

    /// Replace the current state with a save, keeping the live id counters.
    /// A save whose counters are behind the live ones is rejected and nothing changes.
    pub fn reload(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let document = SaveDocument::read(path)?;
        self.world = document.restore(self.world.ids().clone())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EcoError;

    fn quiet_settings() -> EcosystemSettings {
        EcosystemSettings {
            engine: EngineSettings {
                seed: 4,
                catastrophe_odds: 0,
            },
            ..EcosystemSettings::default()
        }
    }

    #[test]
    fn default_population_is_scattered_over_the_grid() {
        let eco = EcoSystem::new(quiet_settings(), &PopulationPlan::default()).unwrap();
        assert_eq!(eco.world().forest().creature_count(), 76);
        let census = eco.census();
        assert_eq!(census[&Species::Blueberry].alive, 20);
        assert_eq!(census[&Species::Bear].alive, 6);
        let occupied = eco
            .world()
            .forest()
            .hectares()
            .filter(|(_, hectare)| !hectare.is_empty())
            .count();
        assert!(occupied > 1);
    }

    #[test]
    fn fill_creatures_validates_arguments() {
        let mut eco = EcoSystem::new(quiet_settings(), &PopulationPlan::empty()).unwrap();
        assert!(eco.is_wasteland());
        assert!(matches!(
            eco.fill_creatures("unicorn", 1, (0, 0)),
            Err(EcoError::InvalidArgument(_))
        ));
        assert!(matches!(
            eco.fill_creatures("boar", 1, (7, 0)),
            Err(EcoError::InvalidArgument(_))
        ));
        let ids = eco.fill_creatures("Boar", 2, (6, 6)).unwrap();
        assert_eq!(ids, vec!["boar0", "boar1"]);
        assert!(!eco.is_wasteland());
    }

    #[test]
    fn population_plan_fills_missing_fields_with_defaults() {
        let plan: PopulationPlan = serde_yaml::from_str("elk: 15\n").unwrap();
        assert_eq!(plan.elk, 15);
        assert_eq!(plan.blueberry, 20);
        assert_eq!(PopulationPlan::default().total(), 76);
    }
}
