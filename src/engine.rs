//! Runs the cycle passes in their fixed order against a [`World`].

use std::time::Instant;

use tracing::{debug, warn};

use crate::{
    error::Result,
    rng::{RngManager, SystemRng},
    systems::{
        AgingSystem, AnimalReproductionSystem, CatastropheSystem, MovementSystem,
        NutritionSystem, PlantReproductionSystem, DEFAULT_CATASTROPHE_ODDS,
    },
    world::World,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    pub seed: u64,
    /// One catastrophe in this many cycles on average; 0 disables it.
    pub catastrophe_odds: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            seed: 0,
            catastrophe_odds: DEFAULT_CATASTROPHE_ODDS,
        }
    }
}

pub struct SystemContext {
    pub cycle: u64,
}

/// What a single pass did to the world.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassOutcome {
    pub births: usize,
    pub deaths: usize,
    pub corpses_removed: usize,
    pub apocalypse: bool,
}

impl PassOutcome {
    fn absorb(&mut self, other: PassOutcome) {
        self.births += other.births;
        self.deaths += other.deaths;
        self.corpses_removed += other.corpses_removed;
        self.apocalypse |= other.apocalypse;
    }
}

pub trait System {
    fn name(&self) -> &str;
    fn run(
        &mut self,
        ctx: &SystemContext,
        world: &mut World,
        rng: &mut SystemRng<'_>,
    ) -> Result<PassOutcome>;
}

#[derive(Clone, Debug)]
pub struct SystemRunReport {
    pub name: String,
    pub duration_ms: f64,
}

#[derive(Clone, Debug)]
pub struct CycleSummary {
    pub cycle: u64,
    /// The forest was a wasteland and nothing ran.
    pub skipped: bool,
    pub outcome: PassOutcome,
    pub system_reports: Vec<SystemRunReport>,
}

pub struct EngineBuilder {
    settings: EngineSettings,
    systems: Vec<Box<dyn System>>,
}

impl EngineBuilder {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            settings,
            systems: Vec::new(),
        }
    }

    pub fn with_system(mut self, system: impl System + 'static) -> Self {
        self.systems.push(Box::new(system));
        self
    }

    pub fn build(self) -> Engine {
        Engine {
            rng: RngManager::new(self.settings.seed),
            systems: self.systems,
            settings: self.settings,
            cycle: 0,
        }
    }
}

pub struct Engine {
    rng: RngManager,
    systems: Vec<Box<dyn System>>,
    settings: EngineSettings,
    cycle: u64,
}

impl Engine {
    /// Nutrition, animal reproduction, plant reproduction, movement, aging and catastrophe.
    pub fn standard(settings: EngineSettings) -> Self {
        EngineBuilder::new(settings)
            .with_system(NutritionSystem::new())
            .with_system(AnimalReproductionSystem::new())
            .with_system(PlantReproductionSystem::new())
            .with_system(MovementSystem::new())
            .with_system(AgingSystem::new())
            .with_system(CatastropheSystem::new(settings.catastrophe_odds))
            .build()
    }

    pub fn settings(&self) -> EngineSettings {
        self.settings
    }

    /// Number of cycles that actually ran.
    pub fn cycles_run(&self) -> u64 {
        self.cycle
    }

    /// Random stream for work done outside the passes, such as stocking the forest.
    pub fn stream(&mut self, name: &str) -> SystemRng<'_> {
        self.rng.stream(name)
    }

    /// Run every pass once. A failing pass leaves `world` exactly as it was before the call.
    pub fn cycle(&mut self, world: &mut World) -> Result<CycleSummary> {
        if world.is_wasteland() {
            debug!(cycle = self.cycle, "wasteland, cycle skipped");
            return Ok(CycleSummary {
                cycle: self.cycle,
                skipped: true,
                outcome: PassOutcome::default(),
                system_reports: Vec::new(),
            });
        }

        let ctx = SystemContext {
            cycle: self.cycle + 1,
        };
        let mut next = world.clone();
        let mut outcome = PassOutcome::default();
        let mut system_reports = Vec::with_capacity(self.systems.len());
        for system in &mut self.systems {
            let mut rng_stream = self.rng.stream(system.name());
            let start = Instant::now();
            let pass = system.run(&ctx, &mut next, &mut rng_stream).map_err(|err| {
                warn!(cycle = ctx.cycle, system = system.name(), %err, "cycle rolled back");
                err
            })?;
            outcome.absorb(pass);
            system_reports.push(SystemRunReport {
                name: system.name().to_string(),
                duration_ms: start.elapsed().as_secs_f64() * 1_000.0,
            });
        }

        *world = next;
        self.cycle = ctx.cycle;
        debug!(
            cycle = ctx.cycle,
            births = outcome.births,
            deaths = outcome.deaths,
            corpses_removed = outcome.corpses_removed,
            "cycle complete"
        );
        Ok(CycleSummary {
            cycle: ctx.cycle,
            skipped: false,
            outcome,
            system_reports,
        })
    }
}
