//! Pinned seeded generator
//!
//! Every implementation of the puzzle must scatter dots identically for the
//! same seed, so the algorithm is fixed: mulberry32 over a 32-bit state.

use rand::rand_core::impls;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

/// Additive step applied to the state before each output
const MULBERRY_INCREMENT: u32 = 0x6D2B_79F5;

/// 2^32, maps a full `u32` onto [0, 1)
const U32_RANGE: f64 = 4_294_967_296.0;

/// mulberry32 generator
///
/// Cannot be rewound; re-seed to restart the stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Next raw 32-bit output
    #[inline]
    pub fn next_word(&mut self) -> u32 {
        self.state = self.state.wrapping_add(MULBERRY_INCREMENT);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    /// Next float in [0, 1)
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_word()) / U32_RANGE
    }
}

impl RngCore for Mulberry32 {
    fn next_u32(&mut self) -> u32 {
        self.next_word()
    }

    fn next_u64(&mut self) -> u64 {
        impls::next_u64_via_u32(self)
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        impls::fill_bytes_via_next(self, dst)
    }
}

impl SeedableRng for Mulberry32 {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }
}
