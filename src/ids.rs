//! Per-species id allocators.

use crate::error::{EcoError, Result};
use crate::species::Species;

/// One monotonic counter per species. Counters never move backwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdRegistry {
    counters: [u64; 7],
}

impl IdRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a fresh id such as `wolf12` and advance the counter.
    pub fn allocate(&mut self, species: Species) -> String {
        let slot = &mut self.counters[species.index()];
        let id = format!("{}{}", species.id_prefix(), slot);
        *slot += 1;
        id
    }

    /// Advance the counter for an entity restored with its recorded id.
    pub fn mark_restored(&mut self, species: Species) {
        self.counters[species.index()] += 1;
    }

    pub fn get(&self, species: Species) -> u64 {
        self.counters[species.index()]
    }

    pub fn set(&mut self, species: Species, value: u64) -> Result<()> {
        let current = self.counters[species.index()];
        if value < current {
            return Err(EcoError::InvalidArgument(format!(
                "new {species} id counter ({value}) must be >= old id counter ({current})"
            )));
        }
        self.counters[species.index()] = value;
        Ok(())
    }
}
