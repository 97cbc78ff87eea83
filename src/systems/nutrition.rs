use crate::{
    engine::{PassOutcome, System, SystemContext},
    error::{EcoError, Result},
    rng::SystemRng,
    world::World,
};

use super::{cells, missing_cell};

/// Every living forager looks for food in its own hectare.
pub struct NutritionSystem;

impl NutritionSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NutritionSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for NutritionSystem {
    fn name(&self) -> &str {
        "nutrition"
    }

    fn run(
        &mut self,
        _ctx: &SystemContext,
        world: &mut World,
        rng: &mut SystemRng<'_>,
    ) -> Result<PassOutcome> {
        let mut outcome = PassOutcome::default();
        for pos in cells(&world.forest) {
            let hectare = world
                .forest
                .hectare_mut(pos)
                .ok_or_else(|| missing_cell(self.name(), pos))?;
            let dead_before = hectare.iter().filter(|c| c.is_dead()).count();
            for index in 0..hectare.len() {
                let hungry = hectare
                    .get_mut(index)
                    .map_or(false, |c| !c.is_dead() && c.as_hunger().is_some());
                if !hungry {
                    continue;
                }
                let mut forager = hectare.take(index).ok_or_else(|| {
                    EcoError::CorruptState(format!("forager #{index} vanished mid-pass"))
                })?;
                if let Some(hunger) = forager.as_hunger() {
                    hunger.search_for_food(hectare, rng);
                }
                hectare.put_back(index, forager);
            }
            let dead_after = hectare.iter().filter(|c| c.is_dead()).count();
            outcome.deaths += dead_after - dead_before;
        }
        Ok(outcome)
    }
}
