use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sylva::{config::ScenarioLoader, EcoSystem};

#[derive(Debug, Parser)]
#[command(author, version, about = "Headless forest ecosystem runner")]
struct Cli {
    /// Path to the scenario YAML file
    #[arg(long, default_value = "scenarios/small_forest.yaml")]
    scenario: PathBuf,

    /// Override cycle count (uses scenario default when omitted)
    #[arg(long)]
    cycles: Option<u64>,

    /// Override the scenario seed
    #[arg(long)]
    seed: Option<u64>,

    /// Start from a saved ecosystem instead of growing a new one
    #[arg(long)]
    load: Option<PathBuf>,

    /// Write the final ecosystem to this file
    #[arg(long)]
    save: Option<PathBuf>,

    /// Kill everything before the first cycle
    #[arg(long)]
    apocalypse: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let loader = ScenarioLoader::new(".");
    let mut scenario = loader.load(&cli.scenario)?;
    if let Some(seed) = cli.seed {
        scenario.seed = seed;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&scenario.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut eco = match &cli.load {
        Some(path) => EcoSystem::load_with_settings(path, scenario.engine_settings())
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => scenario.build_ecosystem()?,
    };
    if cli.apocalypse {
        eco.apocalypse();
    }

    let cycles = scenario.cycles(cli.cycles);
    for _ in 0..cycles {
        let summary = eco.cycle()?;
        if summary.skipped {
            info!(cycle = summary.cycle, "forest is a wasteland, stopping");
            break;
        }
        let world = eco.world();
        info!(
            cycle = summary.cycle,
            alive = world.living_count(),
            total = world.forest().creature_count(),
            births = summary.outcome.births,
            deaths = summary.outcome.deaths,
            "cycle finished"
        );
    }

    if let Some(path) = &cli.save {
        eco.save(path)
            .with_context(|| format!("Failed to save {}", path.display()))?;
    }

    println!(
        "Scenario '{}' ran {} cycles.",
        scenario.name,
        eco.cycles_run()
    );
    println!("{}", serde_json::to_string_pretty(&eco.census())?);
    Ok(())
}
