use crate::{
    engine::{PassOutcome, System, SystemContext},
    error::{EcoError, Result},
    forest::Position,
    rng::SystemRng,
    world::World,
};

/// Living animals wander to a neighbouring hectare. Each one moves at most once per pass.
pub struct MovementSystem;

impl MovementSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MovementSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for MovementSystem {
    fn name(&self) -> &str {
        "movement"
    }

    fn run(
        &mut self,
        _ctx: &SystemContext,
        world: &mut World,
        rng: &mut SystemRng<'_>,
    ) -> Result<PassOutcome> {
        let forest = &mut world.forest;
        let bounds = forest.bounds();
        let movers: Vec<(Position, String)> = forest
            .creatures()
            .filter(|(_, creature)| !creature.is_dead() && creature.as_movable().is_some())
            .map(|(pos, creature)| (pos, creature.id().to_string()))
            .collect();

        for (from, id) in movers {
            let lost = || EcoError::CorruptState(format!("mover {id} left its hectare"));
            let hectare = forest.hectare_mut(from).ok_or_else(lost)?;
            let index = hectare.index_of(&id).ok_or_else(lost)?;
            let to = match hectare.get(index).and_then(|c| c.as_movable()) {
                Some(movable) => movable.destination(from, bounds, rng),
                None => continue,
            };
            if to == from {
                continue;
            }
            let creature = hectare.take(index).ok_or_else(lost)?;
            forest
                .hectare_mut(to)
                .ok_or_else(|| {
                    EcoError::CorruptState(format!(
                        "{id} tried to move to ({}, {}) outside the forest",
                        to.row, to.col
                    ))
                })?
                .push(creature);
        }
        Ok(PassOutcome::default())
    }
}
