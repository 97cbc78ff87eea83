//! Seeded random streams, one per cycle pass.

use std::collections::HashMap;

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub struct RngManager {
    master: ChaCha8Rng,
    streams: HashMap<String, ChaCha8Rng>,
}

impl RngManager {
    pub fn new(seed: u64) -> Self {
        Self {
            master: ChaCha8Rng::seed_from_u64(seed),
            streams: HashMap::new(),
        }
    }

    /// Stream for `name`, derived from the master seed the first time it is requested.
    pub fn stream(&mut self, name: &str) -> SystemRng<'_> {
        let entry = self.streams.entry(name.to_string()).or_insert_with(|| {
            let mut seed_bytes = [0u8; 8];
            self.master.fill_bytes(&mut seed_bytes);
            ChaCha8Rng::seed_from_u64(u64::from_le_bytes(seed_bytes))
        });
        SystemRng { inner: entry }
    }
}

pub struct SystemRng<'a> {
    inner: &'a mut ChaCha8Rng,
}

impl<'a> RngCore for SystemRng<'a> {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.inner.try_fill_bytes(dest)
    }
}

/// Inclusive integer draws, the form every tuning table is written in.
pub trait RngExt {
    fn randint(&mut self, low: i64, high: i64) -> i64;
    fn randint_range(&mut self, range: (u32, u32)) -> u32;
}

impl<R: Rng + ?Sized> RngExt for R {
    fn randint(&mut self, low: i64, high: i64) -> i64 {
        if high <= low {
            return low;
        }
        self.gen_range(low..=high)
    }

    fn randint_range(&mut self, range: (u32, u32)) -> u32 {
        let (low, high) = range;
        if high <= low {
            return low;
        }
        self.gen_range(low..=high)
    }
}
