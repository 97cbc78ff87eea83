use std::collections::HashMap;

use sylva::{
    species::Species, EcoError, EcoSystem, EcosystemSettings, EngineSettings, PopulationPlan,
};
use tempfile::tempdir;

fn grown_ecosystem(seed: u64) -> EcoSystem {
    let settings = EcosystemSettings {
        engine: EngineSettings {
            seed,
            catastrophe_odds: 0,
        },
        ..EcosystemSettings::default()
    };
    // blueberries double roughly every cycle, so they stay out of long runs
    let plan = PopulationPlan {
        blueberry: 0,
        ..PopulationPlan::default()
    };
    let mut eco = EcoSystem::new(settings, &plan).unwrap();
    for _ in 0..8 {
        eco.cycle().unwrap();
    }
    assert!(eco.world().forest().creature_count() <= 200);
    eco
}

type Snapshot = Vec<(Species, (usize, usize), u32, u32, u32, f64, String)>;

fn snapshot(eco: &EcoSystem) -> Snapshot {
    eco.world()
        .forest()
        .creatures()
        .map(|(pos, creature)| {
            let v = creature.vitals();
            (
                creature.species(),
                pos.into(),
                v.age,
                v.hp,
                v.nutritional_value,
                v.power_coefficient,
                v.id.clone(),
            )
        })
        .collect()
}

#[test]
fn save_then_load_round_trips_the_forest() {
    let eco = grown_ecosystem(21);
    let dir = tempdir().unwrap();
    let path = dir.path().join("forest.json");
    eco.save(&path).unwrap();

    let loaded = EcoSystem::load(&path).unwrap();

    assert_eq!(
        loaded.world().forest().bounds(),
        eco.world().forest().bounds()
    );
    assert_eq!(loaded.world().worm(), eco.world().worm());
    assert_eq!(snapshot(&loaded), snapshot(&eco));

    let mut per_species: HashMap<Species, u64> = HashMap::new();
    for (_, creature) in eco.world().forest().creatures() {
        *per_species.entry(creature.species()).or_default() += 1;
    }
    for species in Species::ALL {
        let reloaded = per_species.get(&species).copied().unwrap_or(0);
        assert_eq!(
            loaded.world().ids().get(species),
            eco.world().ids().get(species) + reloaded,
            "{species} counter"
        );
    }
}

#[test]
fn loaded_ecosystem_keeps_cycling() {
    let eco = grown_ecosystem(3);
    let dir = tempdir().unwrap();
    let path = dir.path().join("forest.json");
    eco.save(&path).unwrap();

    let mut loaded = EcoSystem::load(&path).unwrap();
    let before = loaded.world().ids().clone();
    for _ in 0..10 {
        loaded.cycle().unwrap();
    }
    assert!(loaded.world().forest().creature_count() <= 300);
    for species in Species::ALL {
        assert!(loaded.world().ids().get(species) >= before.get(species));
    }
}

#[test]
fn reload_rejects_counters_behind_the_live_ones() {
    let mut eco = grown_ecosystem(9);
    let dir = tempdir().unwrap();
    let path = dir.path().join("forest.json");
    eco.save(&path).unwrap();

    eco.fill_creatures("wolf", 3, (0, 0)).unwrap();
    let world_before = eco.world().clone();

    let err = eco.reload(&path).unwrap_err();
    assert!(matches!(err, EcoError::InvalidArgument(_)));
    assert_eq!(eco.world(), &world_before);
}

#[test]
fn reload_into_a_younger_ecosystem_is_accepted() {
    let eco = grown_ecosystem(9);
    let dir = tempdir().unwrap();
    let path = dir.path().join("forest.json");
    eco.save(&path).unwrap();

    let mut empty = EcoSystem::new(EcosystemSettings::default(), &PopulationPlan::empty()).unwrap();
    empty.reload(&path).unwrap();
    assert_eq!(snapshot(&empty), snapshot(&eco));
}

#[test]
fn loading_garbage_fails_cleanly() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(matches!(
        EcoSystem::load(&path),
        Err(EcoError::Serialization(_))
    ));
    assert!(matches!(
        EcoSystem::load(dir.path().join("missing.json")),
        Err(EcoError::Io(_))
    ));
}
