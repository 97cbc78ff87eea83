use tracing::warn;

use crate::{
    engine::{PassOutcome, System, SystemContext},
    error::Result,
    rng::{RngExt, SystemRng},
    world::World,
};

pub const DEFAULT_CATASTROPHE_ODDS: u32 = 100_000;

/// One draw in `[1, odds]` per cycle; a 1 ends the forest. `odds == 0` disables it.
pub struct CatastropheSystem {
    odds: u32,
}

impl CatastropheSystem {
    pub fn new(odds: u32) -> Self {
        Self { odds }
    }
}

impl Default for CatastropheSystem {
    fn default() -> Self {
        Self::new(DEFAULT_CATASTROPHE_ODDS)
    }
}

impl System for CatastropheSystem {
    fn name(&self) -> &str {
        "catastrophe"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        world: &mut World,
        rng: &mut SystemRng<'_>,
    ) -> Result<PassOutcome> {
        let mut outcome = PassOutcome::default();
        if self.odds == 0 {
            return Ok(outcome);
        }
        if rng.randint(1, self.odds as i64) == 1 {
            warn!(cycle = ctx.cycle, "catastrophe struck the forest");
            outcome.deaths = world.apocalypse();
            outcome.apocalypse = true;
        }
        Ok(outcome)
    }
}
