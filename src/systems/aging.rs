use tracing::debug;

use crate::{
    engine::{PassOutcome, System, SystemContext},
    error::Result,
    rng::SystemRng,
    world::World,
};

/// Ages every living creature, then runs one tick of the deadly worm countdown.
pub struct AgingSystem;

impl AgingSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AgingSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for AgingSystem {
    fn name(&self) -> &str {
        "aging"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        world: &mut World,
        rng: &mut SystemRng<'_>,
    ) -> Result<PassOutcome> {
        let mut outcome = PassOutcome::default();
        for hectare in world.forest.hectares_mut() {
            for creature in hectare.iter_mut() {
                if creature.is_dead() {
                    continue;
                }
                if let Some(aging) = creature.as_aging() {
                    aging.live_time_cycle(rng);
                }
                if creature.is_dead() {
                    outcome.deaths += 1;
                }
            }
        }
        if let Some(removed) = world.deadly_worm_period() {
            debug!(cycle = ctx.cycle, removed, "deadly worm woke up");
            outcome.corpses_removed = removed;
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forest::Position;
    use crate::rng::RngManager;

    #[test]
    fn everyone_ages_and_worm_counts_down() {
        let mut world = World::new(2, 2, 1).unwrap();
        let mut rng = RngManager::new(30);
        world
            .fill_creatures("maple", 3, Position::new(1, 1), &mut rng.stream("population"))
            .unwrap();
        let mut system = AgingSystem::new();

        system
            .run(&SystemContext { cycle: 1 }, &mut world, &mut rng.stream("aging"))
            .unwrap();
        assert_eq!(world.worm().sleep_counter, 0);
        for (_, creature) in world.forest().creatures() {
            assert_eq!(creature.vitals().age, 1);
        }

        system
            .run(&SystemContext { cycle: 2 }, &mut world, &mut rng.stream("aging"))
            .unwrap();
        assert_eq!(world.worm().sleep_counter, 1);
    }

    #[test]
    fn corpses_do_not_age_and_are_cleared() {
        let mut world = World::new(2, 2, 3).unwrap();
        let mut rng = RngManager::new(30);
        world
            .fill_creatures("wolf", 4, Position::new(0, 0), &mut rng.stream("population"))
            .unwrap();
        world.apocalypse();

        let outcome = AgingSystem::new()
            .run(&SystemContext { cycle: 1 }, &mut world, &mut rng.stream("aging"))
            .unwrap();

        assert_eq!(outcome.deaths, 0);
        assert_eq!(outcome.corpses_removed, 4);
        assert!(world.is_wasteland());
        assert_eq!(world.worm().sleep_counter, 3);
    }
}
