use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use super::plant::draw_coefficient;
use super::{
    Aging, Creature, Dieable, Eatable, GenderReproduction, Hunger, Movable, Powerful, Vitals,
};
use crate::forest::{Hectare, Position};
use crate::ids::IdRegistry;
use crate::rng::RngExt;
use crate::species::{AnimalKind, AnimalTraits, PowerCurve, ANIMAL_UNPROTECTED_DAMAGE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Animal {
    kind: AnimalKind,
    gender: Gender,
    sterile_cooldown: u32,
    vitals: Vitals,
}

impl Animal {
    pub fn new(kind: AnimalKind, ids: &mut IdRegistry, rng: &mut dyn RngCore) -> Self {
        let traits = kind.traits();
        let gender = if rng.gen_bool(0.5) {
            Gender::Male
        } else {
            Gender::Female
        };
        let range = match gender {
            Gender::Male => &traits.male_coefficient,
            Gender::Female => &traits.female_coefficient,
        };
        Self {
            kind,
            gender,
            sterile_cooldown: 0,
            vitals: Vitals {
                id: ids.allocate(kind.species()),
                age: 0,
                hp: traits.max_hp,
                nutritional_value: traits.nutrition,
                power_coefficient: draw_coefficient(range, rng),
            },
        }
    }

    /// Rebuild an animal from recorded state. The id is kept verbatim; the counter still advances.
    pub fn restore(
        kind: AnimalKind,
        gender: Gender,
        sterile_cooldown: u32,
        mut vitals: Vitals,
        ids: &mut IdRegistry,
    ) -> Self {
        vitals.hp = vitals.hp.min(kind.traits().max_hp);
        ids.mark_restored(kind.species());
        Self {
            kind,
            gender,
            sterile_cooldown,
            vitals,
        }
    }

    pub fn kind(&self) -> AnimalKind {
        self.kind
    }

    pub fn traits(&self) -> &'static AnimalTraits {
        self.kind.traits()
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn sterile_cooldown(&self) -> u32 {
        self.sterile_cooldown
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

    fn can_mate(&self) -> bool {
        !self.is_dead() && self.sterile_cooldown == 0 && self.in_reproduction_age()
    }

    fn power_curve(&self) -> &'static PowerCurve {
        let traits = self.traits();
        match self.gender {
            Gender::Male => &traits.male_power,
            Gender::Female => &traits.female_power,
        }
    }
}

impl Dieable for Animal {
    fn die(&mut self) {
        self.vitals.die();
    }

    fn is_dead(&self) -> bool {
        self.vitals.is_dead()
    }
}

impl Aging for Animal {
    fn live_time_cycle(&mut self, rng: &mut dyn RngCore) {
        self.vitals.grow_older(self.traits().life_median, rng);
        if !self.is_dead() {
            self.sterile_cooldown = self.sterile_cooldown.saturating_sub(1);
        }
    }
}

impl Powerful for Animal {
    fn power(&self) -> f64 {
        if self.is_dead() {
            return 0.0;
        }
        let saturation = self.traits().reproduction_age.0;
        self.vitals.power_coefficient * self.power_curve().at(self.vitals.age, saturation)
    }
}

impl Eatable for Animal {
    fn be_eaten(&mut self, amount: u32) -> u32 {
        self.vitals.be_eaten(amount, ANIMAL_UNPROTECTED_DAMAGE)
    }

    fn protect(&self, enemy_power: f64) -> bool {
        self.power() > enemy_power
    }
}

impl Hunger for Animal {
    fn search_for_food(&mut self, hectare: &mut Hectare, _rng: &mut dyn RngCore) {
        if self.is_dead() {
            return;
        }
        let traits = self.traits();
        let mut eaten = 0;
        for prey in hectare.iter_mut() {
            if eaten >= traits.required_nutrition {
                break;
            }
            if prey.is_dead() || !self.kind.eats(prey.species()) {
                continue;
            }
            if let Creature::Animal(victim) = prey {
                if victim.protect(self.power()) {
                    self.vitals.hurt(victim.traits().damage);
                    break;
                }
                victim.vitals.hurt(traits.damage);
            }
            if let Some(food) = prey.as_eatable() {
                let bite = traits.bite.min(traits.required_nutrition - eaten);
                eaten += food.be_eaten(bite);
            }
        }
        if self.is_dead() {
            return;
        }
        if eaten >= traits.required_nutrition {
            self.vitals.heal(traits.hp_regen, traits.max_hp);
        } else {
            self.vitals.hurt((traits.required_nutrition - eaten) / 2);
        }
    }
}

impl Movable for Animal {
    fn destination(
        &self,
        from: Position,
        bounds: (usize, usize),
        rng: &mut dyn RngCore,
    ) -> Position {
        let d_row = rng.randint(-1, 1);
        let d_col = rng.randint(-1, 1);
        from.shifted(d_row, d_col, bounds)
    }
}

impl GenderReproduction for Animal {
    fn reproduction(
        &mut self,
        hectare: &mut Hectare,
        ids: &mut IdRegistry,
        rng: &mut dyn RngCore,
    ) -> Vec<Creature> {
        if !self.can_mate() {
            return Vec::new();
        }
        let partner = hectare.iter_mut().find_map(|resident| match resident {
            Creature::Animal(other)
                if other.kind == self.kind && other.gender != self.gender && other.can_mate() =>
            {
                Some(other)
            }
            _ => None,
        });
        let Some(partner) = partner else {
            return Vec::new();
        };
        let traits = self.traits();
        if rng.randint_range(traits.chance_range) != 1 {
            return Vec::new();
        }
        partner.sterile_cooldown = traits.sterile_period;
        self.sterile_cooldown = traits.sterile_period;
        let litter = rng.randint_range(traits.kids_amount);
        (0..litter)
            .map(|_| Creature::Animal(Animal::new(self.kind, ids, rng)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::creature::Plant;
    use crate::rng::RngManager;
    use crate::species::{PlantKind, Species};

    fn adult(kind: AnimalKind, gender: Gender, id: &str, ids: &mut IdRegistry) -> Animal {
        let traits = kind.traits();
        Animal::restore(
            kind,
            gender,
            0,
            Vitals {
                id: id.into(),
                age: traits.reproduction_age.0 + 1,
                hp: traits.max_hp,
                nutritional_value: traits.nutrition,
                power_coefficient: 1.0,
            },
            ids,
        )
    }

    #[test]
    fn fed_animal_heals_and_plant_loses_food() {
        let mut ids = IdRegistry::new();
        let mut rng = RngManager::new(11);
        let mut stream = rng.stream("test");
        let mut elk = adult(AnimalKind::Elk, Gender::Female, "elk0", &mut ids);
        elk.vitals.hp = 100;
        let mut hectare = Hectare::default();
        hectare.push(Creature::Plant(Plant::new(PlantKind::Maple, &mut ids, &mut stream)));
        hectare.push(Creature::Plant(Plant::new(PlantKind::Hazel, &mut ids, &mut stream)));

        elk.search_for_food(&mut hectare, &mut stream);

        assert_eq!(elk.vitals().hp, 135);
        let remaining: u32 = hectare
            .iter()
            .map(|c| c.vitals().nutritional_value)
            .sum();
        assert_eq!(remaining, 100 + 50 - 125);
    }

    #[test]
    fn hungry_animal_loses_half_the_shortfall() {
        let mut ids = IdRegistry::new();
        let mut rng = RngManager::new(11);
        let mut boar = adult(AnimalKind::Boar, Gender::Male, "boar0", &mut ids);
        let mut hectare = Hectare::default();
        boar.search_for_food(&mut hectare, &mut rng.stream("test"));
        assert_eq!(boar.vitals().hp, 200 - 50);
    }

    #[test]
    fn stronger_prey_fights_back() {
        let mut ids = IdRegistry::new();
        let mut rng = RngManager::new(11);
        let mut wolf = adult(AnimalKind::Wolf, Gender::Female, "wolf0", &mut ids);
        wolf.vitals.power_coefficient = 0.1;
        let elk = adult(AnimalKind::Elk, Gender::Male, "elk0", &mut ids);
        let mut hectare = Hectare::default();
        hectare.push(Creature::Animal(elk));

        wolf.search_for_food(&mut hectare, &mut rng.stream("test"));

        assert!(wolf.is_dead());
        assert_eq!(hectare.iter().next().unwrap().vitals().hp, 350);
    }

    #[test]
    fn weaker_prey_is_wounded_and_eaten() {
        let mut ids = IdRegistry::new();
        let mut rng = RngManager::new(11);
        let mut bear = adult(AnimalKind::Bear, Gender::Male, "bear0", &mut ids);
        let mut boar = adult(AnimalKind::Boar, Gender::Female, "boar0", &mut ids);
        boar.vitals.power_coefficient = 0.5;
        let mut hectare = Hectare::default();
        hectare.push(Creature::Animal(boar));

        bear.search_for_food(&mut hectare, &mut rng.stream("test"));

        let prey = hectare.iter().next().unwrap();
        assert!(prey.is_dead());
        assert_eq!(prey.vitals().nutritional_value, 250 - 150);
        assert_eq!(bear.vitals().hp, 300);
    }

    #[test]
    fn mating_needs_opposite_gender_and_sets_cooldown() {
        let mut ids = IdRegistry::new();
        let mut rng = RngManager::new(21);
        let mut stream = rng.stream("test");
        let mut male = adult(AnimalKind::Elk, Gender::Male, "elk0", &mut ids);

        let mut same = Hectare::default();
        same.push(Creature::Animal(adult(
            AnimalKind::Elk,
            Gender::Male,
            "elk1",
            &mut ids,
        )));
        for _ in 0..20 {
            assert!(male.reproduction(&mut same, &mut ids, &mut stream).is_empty());
        }

        let mut pair = Hectare::default();
        pair.push(Creature::Animal(adult(
            AnimalKind::Elk,
            Gender::Female,
            "elk2",
            &mut ids,
        )));
        let mut litter = Vec::new();
        for _ in 0..50 {
            litter = male.reproduction(&mut pair, &mut ids, &mut stream);
            if !litter.is_empty() {
                break;
            }
        }
        assert!((2..=3).contains(&litter.len()));
        assert!(litter.iter().all(|kid| kid.species() == Species::Elk));
        assert_eq!(male.sterile_cooldown(), 3);
        match pair.iter().next().unwrap() {
            Creature::Animal(female) => assert_eq!(female.sterile_cooldown(), 3),
            Creature::Plant(_) => unreachable!(),
        }
        assert!(male.reproduction(&mut pair, &mut ids, &mut stream).is_empty());
    }

    #[test]
    fn movement_stays_inside_bounds() {
        let mut ids = IdRegistry::new();
        let mut rng = RngManager::new(2);
        let mut stream = rng.stream("test");
        let wolf = adult(AnimalKind::Wolf, Gender::Male, "wolf0", &mut ids);
        let corner = Position::new(0, 0);
        for _ in 0..100 {
            let next = wolf.destination(corner, (3, 3), &mut stream);
            assert!(next.row <= 1 && next.col <= 1);
        }
    }
}
