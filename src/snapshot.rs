//! JSON save format: `[config, counters, creature, creature, ...]`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::creature::{Animal, Creature, Gender, Plant, Vitals};
use crate::error::{EcoError, Result};
use crate::forest::Position;
use crate::ids::IdRegistry;
use crate::species::{Kingdom, Species};
use crate::world::World;

fn default_worm_period() -> u32 {
    5
}

fn default_forest_length() -> usize {
    7
}

/// Missing keys fall back to a 7x7 forest with a worm period of 5.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EcosystemRecord {
    #[serde(default = "default_worm_period")]
    pub deadly_worm_sleep_interval: u32,
    #[serde(default = "default_worm_period")]
    pub deadly_worm_sleep_counter: u32,
    #[serde(default = "default_forest_length")]
    pub forest_horizontal_length: usize,
    #[serde(default = "default_forest_length")]
    pub forest_vertical_length: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterRecord {
    pub blueberry_id_counter: u64,
    pub hazel_id_counter: u64,
    pub maple_id_counter: u64,
    pub boar_id_counter: u64,
    pub elk_id_counter: u64,
    pub wolf_id_counter: u64,
    pub bear_id_counter: u64,
}

impl CounterRecord {
    pub fn from_registry(ids: &IdRegistry) -> Self {
        Self {
            blueberry_id_counter: ids.get(Species::Blueberry),
            hazel_id_counter: ids.get(Species::Hazel),
            maple_id_counter: ids.get(Species::Maple),
            boar_id_counter: ids.get(Species::Boar),
            elk_id_counter: ids.get(Species::Elk),
            wolf_id_counter: ids.get(Species::Wolf),
            bear_id_counter: ids.get(Species::Bear),
        }
    }

    fn entries(&self) -> [(Species, u64); 7] {
        [
            (Species::Blueberry, self.blueberry_id_counter),
            (Species::Hazel, self.hazel_id_counter),
            (Species::Maple, self.maple_id_counter),
            (Species::Boar, self.boar_id_counter),
            (Species::Elk, self.elk_id_counter),
            (Species::Wolf, self.wolf_id_counter),
            (Species::Bear, self.bear_id_counter),
        ]
    }

    /// Move every counter forward to the recorded value. Fails on the first backwards step.
    pub fn apply(&self, ids: &mut IdRegistry) -> Result<()> {
        for (species, value) in self.entries() {
            ids.set(species, value)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatureRecord {
    #[serde(rename = "type")]
    pub species: Species,
    pub position: Position,
    pub age: u32,
    pub hp: u32,
    pub nutritional_value: u32,
    pub power_coefficient: f64,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sterile_cooldown: Option<u32>,
}

impl CreatureRecord {
    pub fn capture(position: Position, creature: &Creature) -> Self {
        let vitals = creature.vitals();
        let (gender, sterile_cooldown) = match creature {
            Creature::Plant(_) => (None, None),
            Creature::Animal(animal) => (Some(animal.gender()), Some(animal.sterile_cooldown())),
        };
        Self {
            species: creature.species(),
            position,
            age: vitals.age,
            hp: vitals.hp,
            nutritional_value: vitals.nutritional_value,
            power_coefficient: vitals.power_coefficient,
            id: vitals.id.clone(),
            gender,
            sterile_cooldown,
        }
    }

    /// Rebuild the exact creature. Advances the species counter by one.
    pub fn restore(&self, ids: &mut IdRegistry) -> Result<Creature> {
        let vitals = Vitals {
            id: self.id.clone(),
            age: self.age,
            hp: self.hp,
            nutritional_value: self.nutritional_value,
            power_coefficient: self.power_coefficient,
        };
        let creature = match self.species.kingdom() {
            Kingdom::Plant(kind) => Creature::Plant(Plant::restore(kind, vitals, ids)),
            Kingdom::Animal(kind) => {
                let gender = self.gender.ok_or_else(|| {
                    EcoError::InvalidArgument(format!("animal record {} has no gender", self.id))
                })?;
                Creature::Animal(Animal::restore(
                    kind,
                    gender,
                    self.sterile_cooldown.unwrap_or(0),
                    vitals,
                    ids,
                ))
            }
        };
        Ok(creature)
    }
}

/// A complete saved ecosystem.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveDocument {
    pub config: EcosystemRecord,
    pub counters: CounterRecord,
    pub creatures: Vec<CreatureRecord>,
}

impl SaveDocument {
    pub fn capture(world: &World) -> Self {
        let forest = world.forest();
        let worm = world.worm();
        Self {
            config: EcosystemRecord {
                deadly_worm_sleep_interval: worm.sleep_interval,
                deadly_worm_sleep_counter: worm.sleep_counter,
                forest_horizontal_length: forest.horizontal_length(),
                forest_vertical_length: forest.vertical_length(),
            },
            counters: CounterRecord::from_registry(world.ids()),
            creatures: forest
                .creatures()
                .map(|(pos, creature)| CreatureRecord::capture(pos, creature))
                .collect(),
        }
    }

    pub fn to_value(&self) -> Result<Value> {
        let mut items = Vec::with_capacity(self.creatures.len() + 2);
        items.push(serde_json::to_value(&self.config)?);
        items.push(serde_json::to_value(&self.counters)?);
        for record in &self.creatures {
            items.push(serde_json::to_value(record)?);
        }
        Ok(Value::Array(items))
    }

    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Array(items) = value else {
            return Err(EcoError::InvalidArgument(
                "save document must be a JSON array".into(),
            ));
        };
        let mut items = items.into_iter();
        let config = items.next().ok_or_else(|| {
            EcoError::InvalidArgument("save document has no ecosystem config".into())
        })?;
        let counters = items.next().ok_or_else(|| {
            EcoError::InvalidArgument("save document has no id counters".into())
        })?;
        Ok(Self {
            config: serde_json::from_value(config)?,
            counters: serde_json::from_value(counters)?,
            creatures: items
                .map(serde_json::from_value)
                .collect::<std::result::Result<Vec<CreatureRecord>, _>>()?,
        })
    }

    /// Build a world from this document. Counters in `ids` may only move forward:
    /// they are raised to the recorded values, then advanced once per restored creature.
    pub fn restore(&self, mut ids: IdRegistry) -> Result<World> {
        self.counters.apply(&mut ids)?;
        let mut world = World::new(
            self.config.forest_vertical_length,
            self.config.forest_horizontal_length,
            self.config.deadly_worm_sleep_interval,
        )?;
        world.worm.sleep_counter = self.config.deadly_worm_sleep_counter;
        for record in &self.creatures {
            let creature = record.restore(&mut ids)?;
            let pos = record.position;
            world
                .forest
                .hectare_mut(pos)
                .ok_or_else(|| {
                    EcoError::InvalidArgument(format!(
                        "{} is recorded at ({}, {}) outside the forest",
                        record.id, pos.row, pos.col
                    ))
                })?
                .push(creature);
        }
        world.ids = ids;
        Ok(world)
    }

    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(&self.to_value()?)?;
        fs::write(path, json)?;
        info!(path = %path.display(), creatures = self.creatures.len(), "ecosystem saved");
        Ok(())
    }

    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)?;
        let document = Self::from_value(serde_json::from_str(&data)?)?;
        info!(path = %path.display(), creatures = document.creatures.len(), "ecosystem loaded");
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::RngManager;
    use serde_json::json;

    fn small_world() -> World {
        let mut world = World::new(3, 2, 4).unwrap();
        let mut rng = RngManager::new(17);
        let mut stream = rng.stream("test");
        world
            .fill_creatures("hazel", 2, Position::new(0, 1), &mut stream)
            .unwrap();
        world
            .fill_creatures("wolf", 1, Position::new(2, 0), &mut stream)
            .unwrap();
        world
    }

    #[test]
    fn document_layout_matches_save_format() {
        let value = SaveDocument::capture(&small_world()).to_value().unwrap();
        let items = value.as_array().unwrap();
        assert_eq!(items.len(), 5);
        assert_eq!(
            items[0],
            json!({
                "deadly_worm_sleep_interval": 4,
                "deadly_worm_sleep_counter": 4,
                "forest_horizontal_length": 2,
                "forest_vertical_length": 3
            })
        );
        assert_eq!(items[1]["hazel_id_counter"], 2);
        assert_eq!(items[1]["bear_id_counter"], 0);
        assert_eq!(items[2]["type"], "hazel");
        assert_eq!(items[2]["position"], json!([0, 1]));
        assert!(items[2].get("gender").is_none());
        assert_eq!(items[4]["type"], "wolf");
        assert_eq!(items[4]["id"], "wolf0");
        assert!(items[4]["gender"].is_string());
        assert_eq!(items[4]["sterile_cooldown"], 0);
    }

    #[test]
    fn restore_keeps_ids_and_advances_counters() {
        let world = small_world();
        let document = SaveDocument::capture(&world);
        let restored = document.restore(IdRegistry::new()).unwrap();

        assert_eq!(restored.forest(), world.forest());
        assert_eq!(restored.worm(), world.worm());
        assert_eq!(restored.ids().get(Species::Hazel), 4);
        assert_eq!(restored.ids().get(Species::Wolf), 2);
        assert_eq!(restored.ids().get(Species::Elk), 0);
    }

    #[test]
    fn restore_rejects_backwards_counters() {
        let document = SaveDocument::capture(&small_world());
        let mut ids = IdRegistry::new();
        ids.set(Species::Wolf, 50).unwrap();
        assert!(matches!(
            document.restore(ids),
            Err(EcoError::InvalidArgument(_))
        ));
    }

    #[test]
    fn malformed_documents_are_rejected() {
        assert!(matches!(
            SaveDocument::from_value(json!({"not": "an array"})),
            Err(EcoError::InvalidArgument(_))
        ));
        assert!(matches!(
            SaveDocument::from_value(json!([])),
            Err(EcoError::InvalidArgument(_))
        ));
        let mut document = SaveDocument::capture(&small_world());
        document.creatures[0].position = Position::new(9, 9);
        assert!(matches!(
            document.restore(IdRegistry::new()),
            Err(EcoError::InvalidArgument(_))
        ));
        document.creatures[0].position = Position::new(0, 0);
        document.creatures[2].gender = None;
        assert!(matches!(
            document.restore(IdRegistry::new()),
            Err(EcoError::InvalidArgument(_))
        ));
    }

    #[test]
    fn missing_config_keys_use_defaults() {
        let document = SaveDocument::from_value(json!([
            {"forest_vertical_length": 3},
            {
                "blueberry_id_counter": 0,
                "hazel_id_counter": 0,
                "maple_id_counter": 0,
                "boar_id_counter": 0,
                "elk_id_counter": 0,
                "wolf_id_counter": 0,
                "bear_id_counter": 0
            }
        ]))
        .unwrap();
        assert_eq!(
            document.config,
            EcosystemRecord {
                deadly_worm_sleep_interval: 5,
                deadly_worm_sleep_counter: 5,
                forest_horizontal_length: 7,
                forest_vertical_length: 3,
            }
        );
        let world = document.restore(IdRegistry::new()).unwrap();
        assert_eq!(world.forest().bounds(), (3, 7));
        assert!(world.is_wasteland());
    }
}
