//! Deterministic data generator.
//!
//! A 31-bit linear congruential generator. Every consumer owns its own
//! [`Lcg`] value, so two callers never share or perturb a sequence.

#![forbid(unsafe_code)]

const MULTIPLIER: u32 = 1_103_515_245;
const INCREMENT: u32 = 12_345;
const MASK: u32 = 0x7fff_ffff;

/// Width of the value range produced by [`Lcg::next_value`].
pub const VALUE_SPAN: u32 = 200;
/// Offset subtracted from the raw draw, giving values in `[-50, 150)`.
pub const VALUE_OFFSET: f64 = 50.0;

/// Generator state: a single 31-bit seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lcg {
    state: u32,
}

impl Lcg {
    /// Seed a new generator. The seed itself is never emitted.
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Current state (the last value emitted, or the seed).
    pub fn state(&self) -> u32 {
        self.state
    }

    /// Advance once and return the new 31-bit state.
    #[inline]
    pub fn next_u31(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(MULTIPLIER)
            .wrapping_add(INCREMENT)
            & MASK;
        self.state
    }

    /// Advance once and map the state into `[-50, 150)`.
    #[inline]
    pub fn next_value(&mut self) -> f64 {
        f64::from(self.next_u31() % VALUE_SPAN) - VALUE_OFFSET
    }

    /// Advance once and reduce modulo `len`.
    ///
    /// `len` must be non-zero; callers check for empty buffers first.
    #[inline]
    pub fn next_index(&mut self, len: usize) -> usize {
        self.next_u31() as usize % len
    }
}

/// Produce `count` values from `seed`, advancing the generator once per value.
pub fn generate(count: usize, seed: u32) -> Vec<f64> {
    let mut lcg = Lcg::new(seed);
    (0..count).map(|_| lcg.next_value()).collect()
}
