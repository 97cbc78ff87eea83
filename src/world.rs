use std::collections::BTreeMap;

use rand::RngCore;
use serde::Serialize;
use tracing::{debug, info};

use crate::creature::{Creature, CreatureStats};
use crate::error::{EcoError, Result};
use crate::forest::{Forest, Position};
use crate::ids::IdRegistry;
use crate::species::Species;

/// Countdown to the next removal of corpses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeadlyWorm {
    pub sleep_interval: u32,
    pub sleep_counter: u32,
}

impl DeadlyWorm {
    pub fn new(sleep_interval: u32) -> Self {
        Self {
            sleep_interval,
            sleep_counter: sleep_interval,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SpeciesCount {
    pub alive: usize,
    pub dead: usize,
}

pub type Census = BTreeMap<Species, SpeciesCount>;

/// Complete mutable simulation state: the grid, the id allocators and the worm countdown.
#[derive(Debug, Clone, PartialEq)]
pub struct World {
    pub(crate) forest: Forest,
    pub(crate) ids: IdRegistry,
    pub(crate) worm: DeadlyWorm,
}

impl World {
    pub fn new(vertical_length: usize, horizontal_length: usize, worm_interval: u32) -> Result<Self> {
        Ok(Self {
            forest: Forest::new(vertical_length, horizontal_length)?,
            ids: IdRegistry::new(),
            worm: DeadlyWorm::new(worm_interval),
        })
    }

    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    pub fn ids(&self) -> &IdRegistry {
        &self.ids
    }

    pub fn worm(&self) -> DeadlyWorm {
        self.worm
    }

    /// Stock `amount` fresh creatures of `species` into `cell`. Returns the new ids.
    pub fn fill_creatures(
        &mut self,
        species: &str,
        amount: usize,
        cell: Position,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<String>> {
        if !self.forest.contains(cell) {
            return Err(EcoError::InvalidArgument(format!(
                "hectare ({}, {}) is out of the {}x{} forest",
                cell.row,
                cell.col,
                self.forest.vertical_length(),
                self.forest.horizontal_length()
            )));
        }
        let species: Species = species.parse()?;
        let creatures: Vec<Creature> = (0..amount)
            .map(|_| Creature::spawn(species, &mut self.ids, rng))
            .collect();
        let ids = creatures.iter().map(|c| c.id().to_string()).collect();
        if let Some(hectare) = self.forest.hectare_mut(cell) {
            hectare.extend_hectare(creatures);
        }
        Ok(ids)
    }

    pub fn remove_creature(&mut self, id: &str) -> Result<Creature> {
        let (pos, _) = self
            .forest
            .find(id)
            .ok_or_else(|| EcoError::NotFound(format!("no creature with id {id}")))?;
        let removed = self
            .forest
            .hectare_mut(pos)
            .and_then(|hectare| hectare.remove_by_id(id))
            .ok_or_else(|| EcoError::NotFound(format!("no creature with id {id}")))?;
        info!(id, row = pos.row, col = pos.col, "creature removed");
        Ok(removed)
    }

    pub fn creature_stats(&self, id: &str) -> Result<CreatureStats> {
        self.forest
            .find(id)
            .map(|(_, creature)| creature.stats())
            .ok_or_else(|| EcoError::NotFound(format!("no creature with id {id}")))
    }

    /// No plant or animal left on the grid, dead or alive.
    pub fn is_wasteland(&self) -> bool {
        self.forest.creature_count() == 0
    }

    /// Kill every creature at once and wake the worm for the next cycle.
    pub fn apocalypse(&mut self) -> usize {
        let mut killed = 0;
        for hectare in self.forest.hectares_mut() {
            for creature in hectare.iter_mut() {
                if let Some(dieable) = creature.as_dieable() {
                    if !dieable.is_dead() {
                        dieable.die();
                        killed += 1;
                    }
                }
            }
        }
        self.worm.sleep_counter = 0;
        info!(killed, "apocalypse");
        killed
    }

    /// Remove every dead creature from every hectare.
    pub fn provoke_deadly_worm(&mut self) -> usize {
        let removed: usize = self
            .forest
            .hectares_mut()
            .map(|hectare| hectare.prune_dead())
            .sum();
        debug!(removed, "deadly worm cleared corpses");
        removed
    }

    /// One tick of the worm countdown. Returns the corpses removed, if it woke up.
    pub fn deadly_worm_period(&mut self) -> Option<usize> {
        if self.worm.sleep_counter == 0 {
            let removed = self.provoke_deadly_worm();
            self.worm.sleep_counter = self.worm.sleep_interval;
            Some(removed)
        } else {
            self.worm.sleep_counter -= 1;
            None
        }
    }

    pub fn census(&self) -> Census {
        let mut census: Census = Species::ALL
            .into_iter()
            .map(|species| (species, SpeciesCount::default()))
            .collect();
        for (_, creature) in self.forest.creatures() {
            let entry = census.entry(creature.species()).or_default();
            if creature.is_dead() {
                entry.dead += 1;
            } else {
                entry.alive += 1;
            }
        }
        census
    }

    pub fn living_count(&self) -> usize {
        self.forest
            .creatures()
            .filter(|(_, creature)| !creature.is_dead())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::RngManager;

    fn world_with_creatures() -> World {
        let mut world = World::new(3, 4, 2).unwrap();
        let mut rng = RngManager::new(8);
        let mut stream = rng.stream("test");
        world
            .fill_creatures("wolf", 2, Position::new(0, 3), &mut stream)
            .unwrap();
        world
            .fill_creatures("Maple", 1, Position::new(2, 0), &mut stream)
            .unwrap();
        world
    }

    #[test]
    fn fill_rejects_bad_cells_and_species() {
        let mut world = World::new(3, 4, 2).unwrap();
        let mut rng = RngManager::new(8);
        let mut stream = rng.stream("test");
        assert!(matches!(
            world.fill_creatures("wolf", 1, Position::new(3, 0), &mut stream),
            Err(EcoError::InvalidArgument(_))
        ));
        assert!(matches!(
            world.fill_creatures("wolf", 1, Position::new(0, 4), &mut stream),
            Err(EcoError::InvalidArgument(_))
        ));
        assert!(matches!(
            world.fill_creatures("dragon", 1, Position::new(0, 0), &mut stream),
            Err(EcoError::InvalidArgument(_))
        ));
        assert!(world.is_wasteland());
    }

    #[test]
    fn stats_and_removal_look_up_by_id() {
        let mut world = world_with_creatures();
        let stats = world.creature_stats("maple0").unwrap();
        assert_eq!(stats.species, Species::Maple);
        assert_eq!(stats.kingdom, "plant");
        assert_eq!(world.creature_stats("wolf1").unwrap().kingdom, "animal");

        world.remove_creature("wolf0").unwrap();
        assert!(matches!(
            world.remove_creature("wolf0"),
            Err(EcoError::NotFound(_))
        ));
        assert!(matches!(
            world.creature_stats("wolf0"),
            Err(EcoError::NotFound(_))
        ));
        assert_eq!(world.forest().creature_count(), 2);
    }

    #[test]
    fn apocalypse_kills_and_wakes_worm() {
        let mut world = world_with_creatures();
        assert_eq!(world.apocalypse(), 3);
        assert_eq!(world.worm().sleep_counter, 0);
        assert_eq!(world.living_count(), 0);
        assert!(!world.is_wasteland());

        assert_eq!(world.deadly_worm_period(), Some(3));
        assert!(world.is_wasteland());
        assert_eq!(world.worm().sleep_counter, 2);
    }

    #[test]
    fn worm_counts_down_before_waking() {
        let mut world = world_with_creatures();
        assert_eq!(world.deadly_worm_period(), None);
        assert_eq!(world.deadly_worm_period(), None);
        assert_eq!(world.deadly_worm_period(), Some(0));
        assert_eq!(world.worm().sleep_counter, 2);
    }

    #[test]
    fn census_counts_every_species() {
        let mut world = world_with_creatures();
        world.apocalypse();
        let census = world.census();
        assert_eq!(census.len(), 7);
        assert_eq!(census[&Species::Wolf].dead, 2);
        assert_eq!(census[&Species::Maple].dead, 1);
        assert_eq!(census[&Species::Bear], SpeciesCount::default());
    }
}
