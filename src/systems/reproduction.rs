use rand::RngCore;

use crate::{
    creature::Creature,
    engine::{PassOutcome, System, SystemContext},
    error::{EcoError, Result},
    forest::{Forest, Position},
    rng::{RngExt, SystemRng},
    world::World,
};

use super::{cells, missing_cell};

/// Animals mate inside their hectare; litters stay in the same hectare.
pub struct AnimalReproductionSystem;

impl AnimalReproductionSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AnimalReproductionSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for AnimalReproductionSystem {
    fn name(&self) -> &str {
        "animal_reproduction"
    }

    fn run(
        &mut self,
        _ctx: &SystemContext,
        world: &mut World,
        rng: &mut SystemRng<'_>,
    ) -> Result<PassOutcome> {
        let mut outcome = PassOutcome::default();
        let World { forest, ids, .. } = world;
        for pos in cells(forest) {
            let hectare = forest
                .hectare_mut(pos)
                .ok_or_else(|| missing_cell(self.name(), pos))?;
            // Newborns are appended past this bound and sit the pass out.
            let residents = hectare.len();
            for index in 0..residents {
                let breeder = hectare
                    .get_mut(index)
                    .map_or(false, |c| !c.is_dead() && c.as_gender_reproduction().is_some());
                if !breeder {
                    continue;
                }
                let mut parent = hectare.take(index).ok_or_else(|| {
                    EcoError::CorruptState(format!("parent #{index} vanished mid-pass"))
                })?;
                let litter = match parent.as_gender_reproduction() {
                    Some(breeder) => breeder.reproduction(hectare, ids, rng),
                    None => Vec::new(),
                };
                hectare.put_back(index, parent);
                outcome.births += litter.len();
                hectare.extend_hectare(litter);
            }
        }
        Ok(outcome)
    }
}

/// Plants seed themselves; seedlings land within the species' dispersion radius.
pub struct PlantReproductionSystem;

impl PlantReproductionSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PlantReproductionSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for PlantReproductionSystem {
    fn name(&self) -> &str {
        "plant_reproduction"
    }

    fn run(
        &mut self,
        _ctx: &SystemContext,
        world: &mut World,
        rng: &mut SystemRng<'_>,
    ) -> Result<PassOutcome> {
        let mut outcome = PassOutcome::default();
        let World { forest, ids, .. } = world;
        let residents: Vec<(Position, usize)> = forest
            .hectares()
            .map(|(pos, hectare)| (pos, hectare.len()))
            .collect();
        for (pos, count) in residents {
            for index in 0..count {
                let parent = forest
                    .hectare_mut(pos)
                    .ok_or_else(|| missing_cell(self.name(), pos))?
                    .get_mut(index)
                    .ok_or_else(|| {
                        EcoError::CorruptState(format!(
                            "plant #{index} of hectare ({}, {}) is no longer in the forest",
                            pos.row, pos.col
                        ))
                    })?;
                if parent.is_dead() {
                    continue;
                }
                let Some(seeder) = parent.as_non_gender_reproduction() else {
                    continue;
                };
                let dispersion = seeder.offspring_dispersion();
                let seedlings = seeder.reproduction(ids, rng);
                outcome.births += seedlings.len();
                disperse_offsprings(forest, pos, dispersion, seedlings, rng)?;
            }
        }
        Ok(outcome)
    }
}

/// Scatter seedlings up to `dispersion` cells away on each axis, clamped into the grid.
pub fn disperse_offsprings(
    forest: &mut Forest,
    parent_pos: Position,
    dispersion: u32,
    offsprings: Vec<Creature>,
    rng: &mut dyn RngCore,
) -> Result<()> {
    let reach = dispersion as i64;
    let bounds = forest.bounds();
    for offspring in offsprings {
        if !matches!(offspring, Creature::Plant(_)) {
            return Err(EcoError::CorruptState(format!(
                "offspring {} dispersed like a seed but is not a plant",
                offspring.id()
            )));
        }
        let vertical_shift = rng.randint(-reach, reach);
        let horizontal_shift = rng.randint(-reach, reach);
        let target = parent_pos.shifted(vertical_shift, horizontal_shift, bounds);
        forest
            .hectare_mut(target)
            .ok_or_else(|| {
                EcoError::CorruptState(format!(
                    "seedling target ({}, {}) is outside the forest",
                    target.row, target.col
                ))
            })?
            .push(offspring);
    }
    Ok(())
}
