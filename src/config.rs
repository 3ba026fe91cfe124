//! Configuration for the benchmark workloads.
//!
//! Defaults reproduce the compiled-in constants of the reference workloads.
//! A TOML file can override any subset; missing keys fall back to defaults.

use crate::error::{KernelError, Precondition, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parameters of the matrix / array access suite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    /// Matrix dimension; the scan array holds `size * size` elements.
    pub size: usize,
    /// Stride of the first strided pass.
    pub stride: usize,
    /// Seed of the first random pass.
    pub seed: u32,
    /// Number of random draws per random pass.
    pub iterations: usize,
    /// Extra rounds run after the first pass.
    pub repeats: u32,
    /// Stride used in the extra rounds.
    pub repeat_stride: usize,
    /// Seed of extra round `r` is `repeat_seed_base + r`.
    pub repeat_seed_base: u32,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            size: 128,
            stride: 8,
            seed: 42,
            iterations: 1000,
            repeats: 3,
            repeat_stride: 16,
            repeat_seed_base: 100,
        }
    }
}

impl BenchConfig {
    /// Reject parameters no kernel can run with.
    pub fn validate(&self) -> Result<()> {
        if self.size == 0 {
            return Err(Precondition::ZeroDimension("size").into());
        }
        if self.stride == 0 || self.repeat_stride == 0 {
            return Err(Precondition::ZeroStride.into());
        }
        Ok(())
    }
}

/// Parameters of the sensor preprocessing pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Number of simulated sensors.
    pub num_sensors: usize,
    /// Readings per sensor; readings are laid out sensor by sensor.
    pub samples_per_sensor: usize,
    /// Moving-average window.
    pub filter_window: usize,
    /// Deviation between filtered and raw value that marks an anomaly.
    pub anomaly_threshold: f32,
    /// Filtered values above this are anomalous regardless of deviation.
    pub saturation_level: f32,
    /// Generator seed.
    pub seed: u32,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            num_sensors: 8,
            samples_per_sensor: 1024,
            filter_window: 5,
            anomaly_threshold: 100.0,
            saturation_level: 140.0,
            seed: 12345,
        }
    }
}

impl SensorConfig {
    /// Reject parameters the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.num_sensors == 0 {
            return Err(Precondition::ZeroDimension("num_sensors").into());
        }
        if self.samples_per_sensor == 0 {
            return Err(Precondition::ZeroDimension("samples_per_sensor").into());
        }
        Ok(())
    }

    /// Total readings, or `None` if the product overflows.
    pub fn total_samples(&self) -> Option<usize> {
        self.num_sensors.checked_mul(self.samples_per_sensor)
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemprobeConfig {
    /// Iterations of the branch kernel.
    pub branch_iterations: u64,
    /// Matrix / array suite.
    pub access: BenchConfig,
    /// Sensor pipeline.
    pub sensor: SensorConfig,
}

impl Default for MemprobeConfig {
    fn default() -> Self {
        Self {
            branch_iterations: 1000,
            access: BenchConfig::default(),
            sensor: SensorConfig::default(),
        }
    }
}

impl MemprobeConfig {
    /// Read and validate a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| KernelError::Config(format!("{}: {}", path.display(), e)))?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Parse and validate TOML text. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| KernelError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Render the configuration as TOML, e.g. to seed a config file.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| KernelError::Config(e.to_string()))
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.access.validate()?;
        self.sensor.validate()
    }
}
