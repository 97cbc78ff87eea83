//! Static tuning tables for the seven species of the forest.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EcoError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    Blueberry,
    Hazel,
    Maple,
    Boar,
    Elk,
    Wolf,
    Bear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlantKind {
    Blueberry,
    Hazel,
    Maple,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimalKind {
    Boar,
    Elk,
    Wolf,
    Bear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kingdom {
    Plant(PlantKind),
    Animal(AnimalKind),
}

impl Species {
    pub const ALL: [Species; 7] = [
        Species::Blueberry,
        Species::Hazel,
        Species::Maple,
        Species::Boar,
        Species::Elk,
        Species::Wolf,
        Species::Bear,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Species::Blueberry => "blueberry",
            Species::Hazel => "hazel",
            Species::Maple => "maple",
            Species::Boar => "boar",
            Species::Elk => "elk",
            Species::Wolf => "wolf",
            Species::Bear => "bear",
        }
    }

    /// Prefix of every id minted for this species.
    pub fn id_prefix(self) -> &'static str {
        self.name()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn kingdom(self) -> Kingdom {
        match self {
            Species::Blueberry => Kingdom::Plant(PlantKind::Blueberry),
            Species::Hazel => Kingdom::Plant(PlantKind::Hazel),
            Species::Maple => Kingdom::Plant(PlantKind::Maple),
            Species::Boar => Kingdom::Animal(AnimalKind::Boar),
            Species::Elk => Kingdom::Animal(AnimalKind::Elk),
            Species::Wolf => Kingdom::Animal(AnimalKind::Wolf),
            Species::Bear => Kingdom::Animal(AnimalKind::Bear),
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Species {
    type Err = EcoError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let lowered = value.trim().to_lowercase();
        Species::ALL
            .into_iter()
            .find(|species| species.name() == lowered)
            .ok_or_else(|| EcoError::InvalidArgument(format!("unknown species '{value}'")))
    }
}

/// Power grows linearly with age until `saturation_age`, then stays flat.
#[derive(Debug, Clone, Copy)]
pub struct PowerCurve {
    pub start: f64,
    pub slope: f64,
}

impl PowerCurve {
    pub fn at(&self, age: u32, saturation_age: u32) -> f64 {
        self.start + self.slope * age.min(saturation_age) as f64
    }
}

/// Personal power multiplier, drawn as `randint(min, max) / denominator`.
#[derive(Debug, Clone, Copy)]
pub struct CoefficientRange {
    pub min_numerator: u32,
    pub max_numerator: u32,
    pub denominator: f64,
}

#[derive(Debug)]
pub struct PlantTraits {
    pub life_median: u32,
    pub max_hp: u32,
    pub start_hp: u32,
    pub hp_regen: u32,
    pub shrub_regen: u32,
    pub start_nutrition: u32,
    pub offspring_dispersion: u32,
    pub fruit_nutrition: u32,
    pub fruit_amount: (u32, u32),
    pub reproduction_age: (u32, u32),
    pub chance_range: (u32, u32),
    pub kids_amount: (u32, u32),
    pub power: PowerCurve,
    pub coefficient: CoefficientRange,
    pub unprotected_damage: f64,
}

#[derive(Debug)]
pub struct AnimalTraits {
    pub life_median: u32,
    pub max_hp: u32,
    pub nutrition: u32,
    pub damage: u32,
    pub bite: u32,
    pub required_nutrition: u32,
    pub hp_regen: u32,
    pub reproduction_age: (u32, u32),
    pub chance_range: (u32, u32),
    pub kids_amount: (u32, u32),
    pub sterile_period: u32,
    pub male_power: PowerCurve,
    pub female_power: PowerCurve,
    pub male_coefficient: CoefficientRange,
    pub female_coefficient: CoefficientRange,
    pub diet: &'static [Species],
}

pub const ANIMAL_UNPROTECTED_DAMAGE: f64 = 0.1;

const BLUEBERRY: PlantTraits = PlantTraits {
    life_median: 3,
    max_hp: 10,
    start_hp: 5,
    hp_regen: 5,
    shrub_regen: 5,
    start_nutrition: 30,
    offspring_dispersion: 1,
    fruit_nutrition: 5,
    fruit_amount: (10, 15),
    reproduction_age: (1, 4),
    chance_range: (0, 2),
    kids_amount: (2, 4),
    power: PowerCurve {
        start: 1.0,
        slope: 0.0,
    },
    coefficient: CoefficientRange {
        min_numerator: 1,
        max_numerator: 1,
        denominator: 1.0,
    },
    unprotected_damage: 0.1,
};

const HAZEL: PlantTraits = PlantTraits {
    life_median: 70,
    max_hp: 400,
    start_hp: 10,
    hp_regen: 13,
    shrub_regen: 25,
    start_nutrition: 50,
    offspring_dispersion: 1,
    fruit_nutrition: 10,
    fruit_amount: (10, 15),
    reproduction_age: (30, 70),
    chance_range: (1, 10),
    kids_amount: (2, 4),
    power: PowerCurve {
        start: 5.0,
        slope: 2.0 / 3.0,
    },
    coefficient: CoefficientRange {
        min_numerator: 20,
        max_numerator: 30,
        denominator: 25.0,
    },
    unprotected_damage: 0.05,
};

const MAPLE: PlantTraits = PlantTraits {
    life_median: 200,
    max_hp: 1000,
    start_hp: 10,
    hp_regen: 50,
    shrub_regen: 50,
    start_nutrition: 100,
    offspring_dispersion: 2,
    fruit_nutrition: 5,
    fruit_amount: (25, 35),
    reproduction_age: (50, 200),
    chance_range: (1, 40),
    kids_amount: (1, 3),
    power: PowerCurve {
        start: 10.0,
        slope: 1.0,
    },
    coefficient: CoefficientRange {
        min_numerator: 40,
        max_numerator: 55,
        denominator: 50.0,
    },
    unprotected_damage: 0.075,
};

const BOAR: AnimalTraits = AnimalTraits {
    life_median: 15,
    max_hp: 200,
    nutrition: 250,
    damage: 100,
    bite: 75,
    required_nutrition: 100,
    hp_regen: 20,
    reproduction_age: (5, 11),
    chance_range: (1, 3),
    kids_amount: (3, 5),
    sterile_period: 2,
    male_power: PowerCurve {
        start: 10.0,
        slope: 6.0,
    },
    female_power: PowerCurve {
        start: 8.0,
        slope: 24.0 / 5.0,
    },
    male_coefficient: CoefficientRange {
        min_numerator: 35,
        max_numerator: 45,
        denominator: 40.0,
    },
    female_coefficient: CoefficientRange {
        min_numerator: 25,
        max_numerator: 35,
        denominator: 30.0,
    },
    diet: &[Species::Blueberry, Species::Hazel],
};

const ELK: AnimalTraits = AnimalTraits {
    life_median: 14,
    max_hp: 350,
    nutrition: 600,
    damage: 300,
    bite: 100,
    required_nutrition: 125,
    hp_regen: 35,
    reproduction_age: (4, 12),
    chance_range: (1, 2),
    kids_amount: (2, 3),
    sterile_period: 3,
    male_power: PowerCurve {
        start: 15.0,
        slope: 12.5,
    },
    female_power: PowerCurve {
        start: 10.0,
        slope: 42.5 / 4.0,
    },
    male_coefficient: CoefficientRange {
        min_numerator: 55,
        max_numerator: 75,
        denominator: 65.0,
    },
    female_coefficient: CoefficientRange {
        min_numerator: 40,
        max_numerator: 65,
        denominator: 52.5,
    },
    diet: &[Species::Blueberry, Species::Hazel, Species::Maple],
};

const WOLF: AnimalTraits = AnimalTraits {
    life_median: 10,
    max_hp: 200,
    nutrition: 200,
    damage: 200,
    bite: 100,
    required_nutrition: 150,
    hp_regen: 20,
    reproduction_age: (3, 9),
    chance_range: (1, 3),
    kids_amount: (3, 5),
    sterile_period: 2,
    male_power: PowerCurve {
        start: 12.0,
        slope: 40.5 / 3.0,
    },
    female_power: PowerCurve {
        start: 10.0,
        slope: 35.0 / 3.0,
    },
    male_coefficient: CoefficientRange {
        min_numerator: 40,
        max_numerator: 65,
        denominator: 52.5,
    },
    female_coefficient: CoefficientRange {
        min_numerator: 35,
        max_numerator: 55,
        denominator: 45.0,
    },
    diet: &[Species::Boar, Species::Elk],
};

const BEAR: AnimalTraits = AnimalTraits {
    life_median: 25,
    max_hp: 300,
    nutrition: 600,
    damage: 350,
    bite: 150,
    required_nutrition: 150,
    hp_regen: 30,
    reproduction_age: (8, 20),
    chance_range: (1, 2),
    kids_amount: (2, 3),
    sterile_period: 4,
    male_power: PowerCurve {
        start: 15.0,
        slope: 55.0 / 8.0,
    },
    female_power: PowerCurve {
        start: 12.0,
        slope: 55.5 / 8.0,
    },
    male_coefficient: CoefficientRange {
        min_numerator: 60,
        max_numerator: 80,
        denominator: 70.0,
    },
    female_coefficient: CoefficientRange {
        min_numerator: 55,
        max_numerator: 80,
        denominator: 67.5,
    },
    diet: &[Species::Blueberry, Species::Hazel, Species::Boar, Species::Elk],
};

impl PlantKind {
    pub fn species(self) -> Species {
        match self {
            PlantKind::Blueberry => Species::Blueberry,
            PlantKind::Hazel => Species::Hazel,
            PlantKind::Maple => Species::Maple,
        }
    }

    pub fn traits(self) -> &'static PlantTraits {
        match self {
            PlantKind::Blueberry => &BLUEBERRY,
            PlantKind::Hazel => &HAZEL,
            PlantKind::Maple => &MAPLE,
        }
    }
}

impl AnimalKind {
    pub fn species(self) -> Species {
        match self {
            AnimalKind::Boar => Species::Boar,
            AnimalKind::Elk => Species::Elk,
            AnimalKind::Wolf => Species::Wolf,
            AnimalKind::Bear => Species::Bear,
        }
    }

    pub fn traits(self) -> &'static AnimalTraits {
        match self {
            AnimalKind::Boar => &BOAR,
            AnimalKind::Elk => &ELK,
            AnimalKind::Wolf => &WOLF,
            AnimalKind::Bear => &BEAR,
        }
    }

    pub fn eats(self, prey: Species) -> bool {
        self.traits().diet.contains(&prey)
    }
}
