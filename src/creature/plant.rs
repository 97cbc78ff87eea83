use rand::RngCore;

use super::{Aging, Creature, Dieable, Eatable, NonGenderReproduction, Powerful, Vitals};
use crate::ids::IdRegistry;
use crate::rng::RngExt;
use crate::species::{CoefficientRange, PlantKind, PlantTraits};

#[derive(Debug, Clone, PartialEq)]
pub struct Plant {
    kind: PlantKind,
    vitals: Vitals,
}

pub(super) fn draw_coefficient(range: &CoefficientRange, rng: &mut dyn RngCore) -> f64 {
    let numerator = rng.randint_range((range.min_numerator, range.max_numerator));
    numerator as f64 / range.denominator
}

impl Plant {
    pub fn new(kind: PlantKind, ids: &mut IdRegistry, rng: &mut dyn RngCore) -> Self {
        let traits = kind.traits();
        Self {
            kind,
            vitals: Vitals {
                id: ids.allocate(kind.species()),
                age: 0,
                hp: traits.start_hp,
                nutritional_value: traits.start_nutrition,
                power_coefficient: draw_coefficient(&traits.coefficient, rng),
            },
        }
    }

    /// Rebuild a plant from recorded state. The id is kept verbatim; the counter still advances.
    pub fn restore(kind: PlantKind, mut vitals: Vitals, ids: &mut IdRegistry) -> Self {
        vitals.hp = vitals.hp.min(kind.traits().max_hp);
        ids.mark_restored(kind.species());
        Self { kind, vitals }
    }

    pub fn kind(&self) -> PlantKind {
        self.kind
    }

    pub fn traits(&self) -> &'static PlantTraits {
        self.kind.traits()
    }

    pub fn vitals(&self) -> &Vitals {
        &self.vitals
    }

    pub fn max_hp(&self) -> u32 {
        self.traits().max_hp
    }

    pub fn in_reproduction_age(&self) -> bool {
        let (min_age, max_age) = self.traits().reproduction_age;
        (min_age..=max_age).contains(&self.vitals.age)
    }

    fn can_produce_children(&self) -> bool {
        self.in_reproduction_age() && !self.is_dead()
    }

    fn produce_eatable_offspring(&mut self, rng: &mut dyn RngCore) {
        let traits = self.traits();
        let fruits = rng.randint_range(traits.fruit_amount);
        self.vitals.nutritional_value = self
            .vitals
            .nutritional_value
            .saturating_add(fruits * traits.fruit_nutrition);
    }

    fn regenerate(&mut self) {
        let traits = self.traits();
        if !self.is_dead() && self.vitals.hp < traits.max_hp {
            self.vitals.heal(traits.hp_regen, traits.max_hp);
            self.vitals.nutritional_value = self
                .vitals
                .nutritional_value
                .saturating_add(traits.shrub_regen);
        }
    }
}

impl Dieable for Plant {
    fn die(&mut self) {
        self.vitals.die();
    }

    fn is_dead(&self) -> bool {
        self.vitals.is_dead()
    }
}

impl Aging for Plant {
    fn live_time_cycle(&mut self, rng: &mut dyn RngCore) {
        self.vitals.grow_older(self.traits().life_median, rng);
        if self.is_dead() {
            return;
        }
        if self.can_produce_children() {
            self.produce_eatable_offspring(rng);
        }
        self.regenerate();
    }
}

impl Powerful for Plant {
    fn power(&self) -> f64 {
        if self.is_dead() {
            return 0.0;
        }
        let traits = self.traits();
        self.vitals.power_coefficient
            * traits.power.at(self.vitals.age, traits.reproduction_age.0)
    }
}

impl Eatable for Plant {
    fn be_eaten(&mut self, amount: u32) -> u32 {
        let udm = self.traits().unprotected_damage;
        self.vitals.be_eaten(amount, udm)
    }

    fn protect(&self, _enemy_power: f64) -> bool {
        false
    }
}

impl NonGenderReproduction for Plant {
    fn reproduction(&mut self, ids: &mut IdRegistry, rng: &mut dyn RngCore) -> Vec<Creature> {
        if !self.can_produce_children() {
            return Vec::new();
        }
        let traits = self.traits();
        if rng.randint_range(traits.chance_range) != 1 {
            return Vec::new();
        }
        let grown = rng.randint_range(traits.kids_amount);
        (0..grown)
            .map(|_| Creature::Plant(Plant::new(self.kind, ids, rng)))
            .collect()
    }

    fn offspring_dispersion(&self) -> u32 {
        self.traits().offspring_dispersion
    }
}
