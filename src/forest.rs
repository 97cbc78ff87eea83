//! The grid of hectares creatures live on.

use serde::{Deserialize, Serialize};

use crate::creature::Creature;
use crate::error::{EcoError, Result};

/// Cell coordinate, serialized as `[row, col]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(usize, usize)", into = "(usize, usize)")]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Shift by `(d_row, d_col)` and clamp into `[0, rows) x [0, cols)`.
    pub fn shifted(self, d_row: i64, d_col: i64, bounds: (usize, usize)) -> Position {
        let (rows, cols) = bounds;
        let clamp = |value: usize, delta: i64, len: usize| -> usize {
            let max = len.saturating_sub(1) as i64;
            (value as i64 + delta).clamp(0, max) as usize
        };
        Position {
            row: clamp(self.row, d_row, rows),
            col: clamp(self.col, d_col, cols),
        }
    }
}

impl From<(usize, usize)> for Position {
    fn from((row, col): (usize, usize)) -> Self {
        Position { row, col }
    }
}

impl From<Position> for (usize, usize) {
    fn from(pos: Position) -> Self {
        (pos.row, pos.col)
    }
}

/// One cell. Storage order is stable; the passes visit residents in this order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Hectare {
    creations: Vec<Creature>,
}

impl Hectare {
    pub fn creations(&self) -> &[Creature] {
        &self.creations
    }

    pub fn len(&self) -> usize {
        self.creations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.creations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Creature> {
        self.creations.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Creature> {
        self.creations.iter_mut()
    }

    pub fn get(&self, index: usize) -> Option<&Creature> {
        self.creations.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Creature> {
        self.creations.get_mut(index)
    }

    pub fn push(&mut self, creature: Creature) {
        self.creations.push(creature);
    }

    pub fn extend_hectare(&mut self, creatures: Vec<Creature>) {
        self.creations.extend(creatures);
    }

    pub fn update_hectare(&mut self, creatures: Vec<Creature>) {
        self.creations = creatures;
    }

    /// Lift a resident out so it can act on its neighbours; pair with [`Hectare::put_back`].
    pub fn take(&mut self, index: usize) -> Option<Creature> {
        (index < self.creations.len()).then(|| self.creations.remove(index))
    }

    pub fn put_back(&mut self, index: usize, creature: Creature) {
        let index = index.min(self.creations.len());
        self.creations.insert(index, creature);
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.creations.iter().position(|c| c.id() == id)
    }

    pub fn remove_by_id(&mut self, id: &str) -> Option<Creature> {
        let index = self.index_of(id)?;
        Some(self.creations.remove(index))
    }

    /// Drop every dead resident, returning how many were removed.
    pub fn prune_dead(&mut self) -> usize {
        let before = self.creations.len();
        let alive: Vec<Creature> = self
            .creations
            .drain(..)
            .filter(|creature| !creature.is_dead())
            .collect();
        self.update_hectare(alive);
        before - self.creations.len()
    }
}

/// Fixed-size grid of hectares, stored row-major. Never resized after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Forest {
    vertical_length: usize,
    horizontal_length: usize,
    hectares: Vec<Hectare>,
}

impl Forest {
    pub fn new(vertical_length: usize, horizontal_length: usize) -> Result<Self> {
        if vertical_length == 0 || horizontal_length == 0 {
            return Err(EcoError::InvalidArgument(format!(
                "forest dimensions must be positive, got {vertical_length}x{horizontal_length}"
            )));
        }
        Ok(Self {
            vertical_length,
            horizontal_length,
            hectares: vec![Hectare::default(); vertical_length * horizontal_length],
        })
    }

    pub fn vertical_length(&self) -> usize {
        self.vertical_length
    }

    pub fn horizontal_length(&self) -> usize {
        self.horizontal_length
    }

    /// `(rows, cols)`
    pub fn bounds(&self) -> (usize, usize) {
        (self.vertical_length, self.horizontal_length)
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.vertical_length && pos.col < self.horizontal_length
    }

    pub fn hectare(&self, pos: Position) -> Option<&Hectare> {
        if !self.contains(pos) {
            return None;
        }
        self.hectares.get(pos.row * self.horizontal_length + pos.col)
    }

    pub fn hectare_mut(&mut self, pos: Position) -> Option<&mut Hectare> {
        if !self.contains(pos) {
            return None;
        }
        self.hectares.get_mut(pos.row * self.horizontal_length + pos.col)
    }

    /// All cell positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let cols = self.horizontal_length;
        (0..self.vertical_length * cols).map(move |i| Position::new(i / cols, i % cols))
    }

    pub fn hectares(&self) -> impl Iterator<Item = (Position, &Hectare)> {
        self.positions().zip(self.hectares.iter())
    }

    pub fn hectares_mut(&mut self) -> impl Iterator<Item = &mut Hectare> {
        self.hectares.iter_mut()
    }

    pub fn creatures(&self) -> impl Iterator<Item = (Position, &Creature)> {
        self.hectares()
            .flat_map(|(pos, hectare)| hectare.iter().map(move |creature| (pos, creature)))
    }

    pub fn creature_count(&self) -> usize {
        self.hectares.iter().map(Hectare::len).sum()
    }

    pub fn find(&self, id: &str) -> Option<(Position, &Creature)> {
        self.creatures().find(|(_, creature)| creature.id() == id)
    }
}
