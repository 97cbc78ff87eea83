mod aging;
mod catastrophe;
mod movement;
mod nutrition;
mod reproduction;

pub use aging::AgingSystem;
pub use catastrophe::{CatastropheSystem, DEFAULT_CATASTROPHE_ODDS};
pub use movement::MovementSystem;
pub use nutrition::NutritionSystem;
pub use reproduction::{AnimalReproductionSystem, PlantReproductionSystem};

use crate::error::EcoError;
use crate::forest::{Forest, Position};

/// Row-major list of cells, taken before a pass starts mutating the grid.
fn cells(forest: &Forest) -> Vec<Position> {
    forest.positions().collect()
}

fn missing_cell(pass: &str, pos: Position) -> EcoError {
    EcoError::CorruptState(format!(
        "{pass} pass lost hectare ({}, {})",
        pos.row, pos.col
    ))
}
