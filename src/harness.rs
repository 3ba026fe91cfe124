//! Access suite: the reference matrix / array benchmark sequence.
//!
//! Runs multiply, sequential, strided and random passes once, then repeats
//! them a configured number of times to generate more cache traffic. Nothing
//! here times anything; callers wrap [`AccessSuite::run`] or the individual
//! kernels in whatever clock or counter they use.

use crate::buffer::{Buffer, Matrix};
use crate::config::BenchConfig;
use crate::error::{KernelError, Result};
use crate::invariant_ppt::{
    assert_invariant, MATRIX_DIMENSIONS_MATCH, PRODUCT_DIMENSION, SCAN_ARRAY_STABLE,
};
use crate::kernels::{multiply_into, sum_random, sum_sequential, sum_strided};
use tracing::{debug, info};

/// Results of one sequential / strided / random round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanSums {
    /// Sequential sum over the whole array.
    pub sequential: f64,
    /// Strided sum.
    pub strided: f64,
    /// Random-access sum.
    pub random: f64,
}

/// Everything the suite produces.
#[derive(Debug, Clone, PartialEq)]
pub struct SuiteReport {
    /// `C[0][0]` after the first multiply.
    pub matrix_origin: f64,
    /// `C[size/2 - 1][size/2 - 1]` after the last multiply.
    pub matrix_probe: f64,
    /// First round.
    pub first: ScanSums,
    /// Last round (equal to `first` when `repeats == 0`).
    pub last: ScanSums,
    /// Rounds run, including the first.
    pub rounds: u32,
}

/// Owns the operands and drives the kernels in the reference order.
#[derive(Debug)]
pub struct AccessSuite {
    config: BenchConfig,
    a: Matrix,
    b: Matrix,
    c: Matrix,
    array: Buffer,
}

impl AccessSuite {
    /// Validate `config` and allocate all operands.
    ///
    /// `A[i][j] = i + j`, `B[i][j] = i - j`, `array[i] = 1.5 * i`.
    pub fn new(config: BenchConfig) -> Result<Self> {
        config.validate()?;
        let n = config.size;
        debug!(size = n, "initializing matrices");
        let a = Matrix::from_fn(n, |i, j| (i + j) as f64)?;
        let b = Matrix::from_fn(n, |i, j| i as f64 - j as f64)?;
        let c = Matrix::zeroed(n)?;
        let len = n
            .checked_mul(n)
            .ok_or(KernelError::AllocationFailure { requested: usize::MAX })?;
        let array = Buffer::from_fn(len, |i| i as f64 * 1.5)?;
        assert_invariant(
            MATRIX_DIMENSIONS_MATCH,
            a.dim() == b.dim() && b.dim() == c.dim(),
            "suite operands share one dimension",
            Some("AccessSuite::new"),
        );
        Ok(Self {
            config,
            a,
            b,
            c,
            array,
        })
    }

    /// The configuration in use.
    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    /// Result matrix of the most recent multiply.
    pub fn product(&self) -> &Matrix {
        &self.c
    }

    /// The scan array.
    pub fn array(&self) -> &Buffer {
        &self.array
    }

    /// One multiply plus one round of scans.
    fn round(&mut self, stride: usize, seed: u32) -> Result<ScanSums> {
        multiply_into(&self.a, &self.b, &mut self.c)?;
        assert_invariant(
            PRODUCT_DIMENSION,
            self.c.dim() == self.config.size && self.c.as_slice().len() == self.array.len(),
            "product keeps the configured dimension",
            Some("round"),
        );
        let data = self.array.as_slice();
        Ok(ScanSums {
            sequential: sum_sequential(data),
            strided: sum_strided(data, stride)?,
            random: sum_random(data, seed, self.config.iterations),
        })
    }

    /// Run the first round, then `repeats` more.
    pub fn run(&mut self) -> Result<SuiteReport> {
        let cfg = self.config.clone();
        info!(size = cfg.size, stride = cfg.stride, seed = cfg.seed, "running access suite");

        let first = self.round(cfg.stride, cfg.seed)?;
        let matrix_origin = self.c.get(0, 0);
        debug!(matrix_origin, ?first, "first round");

        let mut last = first;
        let mut rounds: u32 = 1;
        for r in 0..cfg.repeats {
            last = self.round(cfg.repeat_stride, cfg.repeat_seed_base.wrapping_add(r))?;
            rounds += 1;
        }

        let mid = (cfg.size / 2).saturating_sub(1);
        let report = SuiteReport {
            matrix_origin,
            matrix_probe: self.c.get(mid, mid),
            first,
            last,
            rounds,
        };
        assert_invariant(
            SCAN_ARRAY_STABLE,
            report.last.sequential.to_bits() == report.first.sequential.to_bits(),
            "scans leave the array untouched",
            Some("AccessSuite::run"),
        );
        info!(rounds = report.rounds, "access suite complete");
        Ok(report)
    }
}
