//! PPT Invariant System: invariant enforcement with contract tracking.
//!
//! Setup and pipeline code asserts invariants here; the hot loops in
//! `kernels` never do, because the log sits behind a `Mutex`.

#[cfg(feature = "ppt")]
use lazy_static::lazy_static;
#[cfg(feature = "ppt")]
use std::collections::HashSet;
#[cfg(feature = "ppt")]
use std::sync::Mutex;

// Invariant constants for contract tracking
pub const PRODUCT_DIMENSION: u32 = 1;
pub const MATRIX_DIMENSIONS_MATCH: u32 = 2;
pub const BUFFER_ALLOCATED: u32 = 3;
pub const GENERATOR_DETERMINISTIC: u32 = 4;
pub const FILTER_LENGTH_PRESERVED: u32 = 5;
pub const NORMALIZED_IN_UNIT_RANGE: u32 = 6;
pub const STATS_COUNT_MATCHES: u32 = 7;
pub const SCAN_ARRAY_STABLE: u32 = 8;

#[cfg(feature = "ppt")]
lazy_static! {
    static ref INVARIANT_LOG: Mutex<HashSet<u32>> = Mutex::new(HashSet::new());
}

#[cfg(feature = "ppt")]
/// Assert an invariant: logs it and panics on failure.
pub(crate) fn assert_invariant(id: u32, condition: bool, message: &str, context: Option<&str>) {
    if !condition {
        let full_message = if let Some(ctx) = context {
            format!("Invariant {} failed: {} (context: {})", id, message, ctx)
        } else {
            format!("Invariant {} failed: {}", id, message)
        };
        tracing::error!("{}", full_message);
        panic!("{}", full_message);
    }
    // A poisoned log only means another test panicked mid-insert.
    INVARIANT_LOG
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .insert(id);
}

#[cfg(not(feature = "ppt"))]
/// Assert an invariant: checks condition and panics on failure.
pub(crate) fn assert_invariant(_id: u32, condition: bool, message: &str, _context: Option<&str>) {
    if !condition {
        panic!("Invariant failed: {}", message);
    }
}

#[cfg(feature = "ppt")]
/// Contract test: checks that specified invariants were asserted.
pub fn contract_test(test_name: &str, required_invariants: &[u32]) {
    let log = INVARIANT_LOG
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    let missing: Vec<u32> = required_invariants
        .iter()
        .copied()
        .filter(|inv| !log.contains(inv))
        .collect();
    drop(log); // Drop the lock before panicking
    if !missing.is_empty() {
        panic!(
            "Contract test '{}' failed: invariants not enforced: {:?}",
            test_name,
            missing.iter().map(|&id| invariant_name(id)).collect::<Vec<_>>()
        );
    }
}

#[cfg(not(feature = "ppt"))]
/// Contract test: no-op when PPT feature is disabled.
pub fn contract_test(_test_name: &str, _required_invariants: &[u32]) {}

/// Maps an invariant ID to a human-readable name (for diagnostics only).
pub const fn invariant_name(id: u32) -> &'static str {
    match id {
        PRODUCT_DIMENSION => "PRODUCT_DIMENSION",
        MATRIX_DIMENSIONS_MATCH => "MATRIX_DIMENSIONS_MATCH",
        BUFFER_ALLOCATED => "BUFFER_ALLOCATED",
        GENERATOR_DETERMINISTIC => "GENERATOR_DETERMINISTIC",
        FILTER_LENGTH_PRESERVED => "FILTER_LENGTH_PRESERVED",
        NORMALIZED_IN_UNIT_RANGE => "NORMALIZED_IN_UNIT_RANGE",
        STATS_COUNT_MATCHES => "STATS_COUNT_MATCHES",
        SCAN_ARRAY_STABLE => "SCAN_ARRAY_STABLE",
        _ => "UNKNOWN",
    }
}
