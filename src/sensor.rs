//! Sensor preprocessing pipeline.
//!
//! Readings are generated in bulk, then mutated in place by each stage in
//! turn: filter, anomaly detection, aggregation, normalization and
//! per-sensor averaging. Every stage takes the whole slice exclusively.

#![forbid(unsafe_code)]

use crate::buffer::try_alloc;
use crate::config::SensorConfig;
use crate::error::{KernelError, Result};
use crate::filter::{normalize_each, window_mean};
use crate::invariant_ppt::{assert_invariant, GENERATOR_DETERMINISTIC, STATS_COUNT_MATCHES};
use crate::prng::Lcg;
use crate::stats::{count_where, AggregateStats};
use tracing::{debug, info};

/// One sample from one simulated sensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReading {
    /// Which sensor produced the sample.
    pub sensor_id: u32,
    /// Value as generated.
    pub raw_value: f32,
    /// Smoothed value; after normalization, rescaled into `[0, 1]`.
    pub filtered_value: f32,
    /// Set by anomaly detection.
    pub anomaly: bool,
}

/// Generate `num_sensors * samples_per_sensor` readings, laid out sensor by sensor.
pub fn generate_readings(config: &SensorConfig) -> Result<Vec<SensorReading>> {
    config.validate()?;
    let total = config
        .total_samples()
        .ok_or(KernelError::AllocationFailure { requested: usize::MAX })?;
    let mut readings = try_alloc(total)?;
    let mut lcg = Lcg::new(config.seed);
    for i in 0..total {
        readings.push(SensorReading {
            sensor_id: (i / config.samples_per_sensor) as u32,
            raw_value: lcg.next_value() as f32,
            filtered_value: 0.0,
            anomaly: false,
        });
    }
    let reseeded = Lcg::new(config.seed).next_value() as f32;
    assert_invariant(
        GENERATOR_DETERMINISTIC,
        readings.first().map_or(true, |r| r.raw_value == reseeded),
        "reseeding reproduces the first reading",
        Some("generate_readings"),
    );
    Ok(readings)
}

/// Fill `filtered_value` with the moving average of the raw values.
///
/// The raw column is copied into a scratch buffer first, so a failed
/// allocation is reported instead of aborting.
pub fn apply_filter(readings: &mut [SensorReading], window: usize) -> Result<()> {
    let mut raw = try_alloc(readings.len())?;
    raw.extend(readings.iter().map(|r| r.raw_value));
    let half = window / 2;
    for (i, reading) in readings.iter_mut().enumerate() {
        reading.filtered_value = window_mean(&raw, i, half);
    }
    Ok(())
}

/// Flag readings whose filtered value strays more than `threshold` from the
/// raw value, or exceeds `saturation`. Returns how many are flagged.
pub fn detect_anomalies(readings: &mut [SensorReading], threshold: f32, saturation: f32) -> usize {
    for r in readings.iter_mut() {
        let deviation = (r.filtered_value - r.raw_value).abs();
        if deviation > threshold || r.filtered_value > saturation {
            r.anomaly = true;
        }
    }
    count_where(readings, |r| r.anomaly)
}

/// Aggregate the filtered values; `anomaly_count` comes from the flags.
pub fn aggregate_readings(readings: &[SensorReading]) -> AggregateStats {
    let mut stats = AggregateStats::EMPTY;
    for r in readings {
        stats.push(r.filtered_value);
    }
    stats.anomaly_count = count_where(readings, |r| r.anomaly);
    assert_invariant(
        STATS_COUNT_MATCHES,
        stats.count == readings.len(),
        "every reading counted once",
        Some("aggregate_readings"),
    );
    stats
}

/// Rescale filtered values into `[0, 1]` using `stats`. No-op (returns
/// `false`) when the observed range is too narrow.
pub fn normalize_readings(readings: &mut [SensorReading], stats: &AggregateStats) -> bool {
    normalize_each(
        readings.iter_mut().map(|r| &mut r.filtered_value),
        stats.min,
        stats.max,
    )
}

/// Mean filtered value of each consecutive group of `samples_per_sensor` readings.
pub fn per_sensor_means(readings: &[SensorReading], samples_per_sensor: usize) -> Vec<f32> {
    if samples_per_sensor == 0 {
        return Vec::new();
    }
    readings
        .chunks(samples_per_sensor)
        .map(|chunk| {
            let mut sum = 0.0f32;
            for r in chunk {
                sum += r.filtered_value;
            }
            sum / chunk.len() as f32
        })
        .collect()
}

/// Outcome of a full pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorReport {
    /// Statistics of the filtered values, taken before normalization.
    pub stats: AggregateStats,
    /// Mean normalized value per sensor.
    pub per_sensor_means: Vec<f32>,
    /// Whether normalization ran (false when the range was degenerate).
    pub normalized: bool,
}

impl SensorReport {
    /// Percentage of readings flagged anomalous.
    pub fn anomaly_percent(&self) -> f32 {
        100.0 * self.stats.anomaly_rate()
    }
}

/// Runs the stages in order over freshly generated readings.
#[derive(Debug, Clone)]
pub struct SensorPipeline {
    config: SensorConfig,
}

impl SensorPipeline {
    /// Create a pipeline for `config`.
    pub fn new(config: SensorConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &SensorConfig {
        &self.config
    }

    /// Run every stage and report. The readings are dropped before returning.
    pub fn run(&self) -> Result<SensorReport> {
        let (report, _) = self.run_with_readings()?;
        Ok(report)
    }

    /// Run every stage and hand back the final readings alongside the report.
    pub fn run_with_readings(&self) -> Result<(SensorReport, Vec<SensorReading>)> {
        let cfg = &self.config;
        info!(
            sensors = cfg.num_sensors,
            samples_per_sensor = cfg.samples_per_sensor,
            window = cfg.filter_window,
            "starting sensor pipeline"
        );

        debug!("generating sensor data");
        let mut readings = generate_readings(cfg)?;

        debug!("applying moving average filter");
        apply_filter(&mut readings, cfg.filter_window)?;

        debug!("detecting anomalies");
        let flagged = detect_anomalies(&mut readings, cfg.anomaly_threshold, cfg.saturation_level);

        debug!("computing aggregate statistics");
        let stats = aggregate_readings(&readings);

        debug!("normalizing data");
        let normalized = normalize_readings(&mut readings, &stats);
        if !normalized {
            tracing::warn!(min = stats.min, max = stats.max, "range too narrow, skipped normalization");
        }

        debug!("computing per-sensor statistics");
        let per_sensor_means = per_sensor_means(&readings, cfg.samples_per_sensor);

        info!(flagged, total = readings.len(), "sensor pipeline complete");
        Ok((
            SensorReport {
                stats,
                per_sensor_means,
                normalized,
            },
            readings,
        ))
    }
}
