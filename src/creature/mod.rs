//! Creatures of the forest and the capabilities they expose to the cycle passes.
//!
//! Every creature is either a [`Plant`] or an [`Animal`]. The passes never inspect the
//! species directly; they ask a creature for a capability (`as_hunger`, `as_movable`, ...)
//! and act only on the ones that answer.

mod animal;
mod plant;

pub use animal::{Animal, Gender};
pub use plant::Plant;

use rand::RngCore;
use serde::Serialize;

use crate::forest::{Hectare, Position};
use crate::ids::IdRegistry;
use crate::rng::RngExt;
use crate::species::{Kingdom, Species};

pub const DEAD_SUFFIX: &str = "_dead";

/// One in this many aging creatures dies unexpectedly each cycle.
pub const UNEXPECTED_DEATH_ODDS: i64 = 10_000;

pub trait Dieable {
    fn die(&mut self);
    fn is_dead(&self) -> bool;
}

pub trait Aging {
    /// Advance age by one cycle, roll for natural death and regenerate if still alive.
    fn live_time_cycle(&mut self, rng: &mut dyn RngCore);
}

pub trait Powerful {
    fn power(&self) -> f64;
}

pub trait Eatable {
    /// Give up to `amount` nutrition and take damage for it. Returns what was actually given.
    fn be_eaten(&mut self, amount: u32) -> u32;
    fn protect(&self, enemy_power: f64) -> bool;
}

pub trait Hunger {
    /// Forage among the other residents of `hectare`; the forager itself is not in it.
    fn search_for_food(&mut self, hectare: &mut Hectare, rng: &mut dyn RngCore);
}

pub trait Movable {
    fn destination(
        &self,
        from: Position,
        bounds: (usize, usize),
        rng: &mut dyn RngCore,
    ) -> Position;
}

pub trait GenderReproduction {
    /// Mate with a partner from `hectare`; offspring are returned for the caller to place.
    fn reproduction(
        &mut self,
        hectare: &mut Hectare,
        ids: &mut IdRegistry,
        rng: &mut dyn RngCore,
    ) -> Vec<Creature>;
}

pub trait NonGenderReproduction {
    fn reproduction(&mut self, ids: &mut IdRegistry, rng: &mut dyn RngCore) -> Vec<Creature>;
    fn offspring_dispersion(&self) -> u32;
}

/// Identity and mutable state shared by plants and animals.
#[derive(Debug, Clone, PartialEq)]
pub struct Vitals {
    pub id: String,
    pub age: u32,
    pub hp: u32,
    pub nutritional_value: u32,
    pub power_coefficient: f64,
}

impl Vitals {
    pub fn is_dead(&self) -> bool {
        self.id.ends_with(DEAD_SUFFIX)
    }

    pub fn die(&mut self) {
        if !self.is_dead() {
            self.id.push_str(DEAD_SUFFIX);
        }
    }

    pub fn hurt(&mut self, damage: u32) {
        self.hp = self.hp.saturating_sub(damage);
        if self.hp == 0 {
            self.die();
        }
    }

    pub fn heal(&mut self, amount: u32, max_hp: u32) {
        if !self.is_dead() {
            self.hp = self.hp.saturating_add(amount).min(max_hp);
        }
    }

    /// A bite larger than the remaining food empties it and wounds by half the shortfall;
    /// otherwise the food shrinks and the wound is a fixed fraction of the bite.
    pub fn be_eaten(&mut self, amount: u32, unprotected_damage: f64) -> u32 {
        if amount > self.nutritional_value {
            let given = self.nutritional_value;
            let shortfall = amount - given;
            self.nutritional_value = 0;
            self.hurt(shortfall / 2);
            given
        } else {
            self.nutritional_value -= amount;
            self.hurt((amount as f64 * unprotected_damage) as u32);
            amount
        }
    }

    /// Age by one cycle. Past the life median death becomes likelier every cycle.
    pub(crate) fn grow_older(&mut self, life_median: u32, rng: &mut dyn RngCore) {
        if self.is_dead() {
            return;
        }
        self.age += 1;
        if self.age > life_median {
            let chance = rng.randint(0, (self.age - life_median) as i64);
            if chance != 0 {
                self.die();
                return;
            }
        }
        if rng.randint(1, UNEXPECTED_DEATH_ODDS) == 1 {
            self.die();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatureStats {
    pub kingdom: &'static str,
    pub species: Species,
    pub id: String,
    pub dead: bool,
    pub age: u32,
    pub hp: u32,
    pub max_hp: u32,
    pub power: f64,
    pub nutritional_value: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    pub can_reproduce: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Creature {
    Plant(Plant),
    Animal(Animal),
}

impl Creature {
    /// A freshly born creature with starting stats and a random power coefficient.
    pub fn spawn(species: Species, ids: &mut IdRegistry, rng: &mut dyn RngCore) -> Self {
        match species.kingdom() {
            Kingdom::Plant(kind) => Creature::Plant(Plant::new(kind, ids, rng)),
            Kingdom::Animal(kind) => Creature::Animal(Animal::new(kind, ids, rng)),
        }
    }

    pub fn species(&self) -> Species {
        match self {
            Creature::Plant(plant) => plant.kind().species(),
            Creature::Animal(animal) => animal.kind().species(),
        }
    }

    pub fn vitals(&self) -> &Vitals {
        match self {
            Creature::Plant(plant) => plant.vitals(),
            Creature::Animal(animal) => animal.vitals(),
        }
    }

    pub fn id(&self) -> &str {
        &self.vitals().id
    }

    pub fn max_hp(&self) -> u32 {
        match self {
            Creature::Plant(plant) => plant.max_hp(),
            Creature::Animal(animal) => animal.max_hp(),
        }
    }

    pub fn is_dead(&self) -> bool {
        self.vitals().is_dead()
    }

    pub fn power(&self) -> f64 {
        match self {
            Creature::Plant(plant) => plant.power(),
            Creature::Animal(animal) => animal.power(),
        }
    }

    pub fn stats(&self) -> CreatureStats {
        let vitals = self.vitals();
        let (kingdom, gender, can_reproduce) = match self {
            Creature::Plant(plant) => ("plant", None, plant.in_reproduction_age()),
            Creature::Animal(animal) => {
                ("animal", Some(animal.gender()), animal.in_reproduction_age())
            }
        };
        CreatureStats {
            kingdom,
            species: self.species(),
            id: vitals.id.clone(),
            dead: vitals.is_dead(),
            age: vitals.age,
            hp: vitals.hp,
            max_hp: self.max_hp(),
            power: self.power(),
            nutritional_value: vitals.nutritional_value,
            gender,
            can_reproduce,
        }
    }

    pub fn as_dieable(&mut self) -> Option<&mut dyn Dieable> {
        match self {
            Creature::Plant(plant) => Some(plant),
            Creature::Animal(animal) => Some(animal),
        }
    }

    pub fn as_aging(&mut self) -> Option<&mut dyn Aging> {
        match self {
            Creature::Plant(plant) => Some(plant),
            Creature::Animal(animal) => Some(animal),
        }
    }

    pub fn as_eatable(&mut self) -> Option<&mut dyn Eatable> {
        match self {
            Creature::Plant(plant) => Some(plant),
            Creature::Animal(animal) => Some(animal),
        }
    }

    pub fn as_hunger(&mut self) -> Option<&mut dyn Hunger> {
        match self {
            Creature::Animal(animal) => Some(animal),
            Creature::Plant(_) => None,
        }
    }

    pub fn as_movable(&self) -> Option<&dyn Movable> {
        match self {
            Creature::Animal(animal) => Some(animal),
            Creature::Plant(_) => None,
        }
    }

    pub fn as_gender_reproduction(&mut self) -> Option<&mut dyn GenderReproduction> {
        match self {
            Creature::Animal(animal) => Some(animal),
            Creature::Plant(_) => None,
        }
    }

    pub fn as_non_gender_reproduction(&mut self) -> Option<&mut dyn NonGenderReproduction> {
        match self {
            Creature::Plant(plant) => Some(plant),
            Creature::Animal(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vitals(nutritional_value: u32, hp: u32) -> Vitals {
        Vitals {
            id: "hazel3".into(),
            age: 0,
            hp,
            nutritional_value,
            power_coefficient: 1.0,
        }
    }

    #[test]
    fn death_suffixes_id_once() {
        let mut v = vitals(10, 10);
        v.die();
        v.die();
        assert_eq!(v.id, "hazel3_dead");
        assert!(v.is_dead());
    }

    #[test]
    fn protected_bite_takes_fraction_of_amount() {
        let mut v = vitals(100, 50);
        assert_eq!(v.be_eaten(40, 0.1), 40);
        assert_eq!(v.nutritional_value, 60);
        assert_eq!(v.hp, 46);
    }

    #[test]
    fn oversized_bite_wounds_by_half_the_shortfall() {
        let mut v = vitals(30, 50);
        assert_eq!(v.be_eaten(70, 0.1), 30);
        assert_eq!(v.nutritional_value, 0);
        assert_eq!(v.hp, 30);
    }

    #[test]
    fn hurt_saturates_and_kills() {
        let mut v = vitals(0, 5);
        v.hurt(100);
        assert_eq!(v.hp, 0);
        assert!(v.is_dead());
        v.heal(10, 20);
        assert_eq!(v.hp, 0);
    }

    #[test]
    fn young_creatures_only_die_unexpectedly() {
        let mut rng = crate::rng::RngManager::new(13);
        let mut stream = rng.stream("test");
        let mut deaths = 0;
        for _ in 0..200 {
            let mut v = vitals(10, 10);
            for _ in 0..50 {
                v.grow_older(100, &mut stream);
            }
            if v.is_dead() {
                deaths += 1;
            } else {
                assert_eq!(v.age, 50);
            }
        }
        // 10_000 draws at 1/10_000 each
        assert!(deaths <= 10, "{deaths} deaths below the life median");
    }

    #[test]
    fn old_creatures_mostly_die() {
        let mut rng = crate::rng::RngManager::new(13);
        let mut stream = rng.stream("test");
        let mut deaths = 0;
        for _ in 0..500 {
            let mut v = vitals(10, 10);
            v.age = 10;
            v.grow_older(3, &mut stream);
            assert_eq!(v.age, 11);
            if v.is_dead() {
                deaths += 1;
            }
        }
        // survival needs randint(0, 8) == 0
        assert!(deaths > 400, "only {deaths} of 500 died");
    }

    #[test]
    fn corpses_do_not_age() {
        let mut rng = crate::rng::RngManager::new(13);
        let mut v = vitals(10, 10);
        v.die();
        v.grow_older(3, &mut rng.stream("test"));
        assert_eq!(v.age, 0);
    }
}
