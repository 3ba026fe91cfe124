//! Deterministic memory-access and arithmetic microbenchmark kernels.
//!
//! Kernels borrow caller-owned buffers and return raw numbers; timing and
//! printing belong to the caller.

pub mod buffer;
pub mod config;
pub mod error;
pub mod filter;
pub mod harness;
#[doc(hidden)]
pub mod invariant_ppt;
pub mod kernels;
pub mod prng;
pub mod sensor;
pub mod stats;

pub use buffer::{Buffer, Matrix};
pub use config::{BenchConfig, MemprobeConfig, SensorConfig};
pub use error::{KernelError, Precondition};
pub use filter::{moving_average, normalize, normalize_in_place};
pub use harness::{AccessSuite, ScanSums, SuiteReport};
pub use kernels::{
    branch_mix, multiply, multiply_into, sum_random, sum_random_with, sum_sequential, sum_strided,
};
pub use prng::{generate, Lcg};
pub use sensor::{SensorPipeline, SensorReading, SensorReport};
pub use stats::{aggregate, count_where, AggregateStats};
