//! Contract tests: drive each stage and check that its invariants fired.
//!
//! The access suite and the sensor pipeline assert disjoint invariant sets,
//! so sharing one log in this binary cannot mask a missing assertion. The
//! filter helpers overlap with the pipeline and live in `filter_contract.rs`.

use memprobe::harness::AccessSuite;
use memprobe::invariant_ppt::{
    contract_test, BUFFER_ALLOCATED, GENERATOR_DETERMINISTIC, MATRIX_DIMENSIONS_MATCH,
    NORMALIZED_IN_UNIT_RANGE, PRODUCT_DIMENSION, SCAN_ARRAY_STABLE, STATS_COUNT_MATCHES,
};
use memprobe::sensor::SensorPipeline;
use memprobe::{BenchConfig, SensorConfig};

#[test]
fn access_suite_contract() {
    let mut suite = AccessSuite::new(BenchConfig {
        size: 16,
        ..BenchConfig::default()
    })
    .unwrap();
    suite.run().unwrap();
    contract_test(
        "access suite",
        &[BUFFER_ALLOCATED, MATRIX_DIMENSIONS_MATCH, PRODUCT_DIMENSION, SCAN_ARRAY_STABLE],
    );
}

#[test]
fn sensor_pipeline_contract() {
    SensorPipeline::new(SensorConfig {
        num_sensors: 2,
        samples_per_sensor: 64,
        ..SensorConfig::default()
    })
    .run()
    .unwrap();
    contract_test(
        "sensor pipeline",
        &[GENERATOR_DETERMINISTIC, STATS_COUNT_MATCHES, NORMALIZED_IN_UNIT_RANGE],
    );
}
