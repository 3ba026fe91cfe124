//! Aggregation pass over a value stream.

#![forbid(unsafe_code)]

/// Summary of one aggregation pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateStats {
    /// Smallest value seen, `+∞` if none.
    pub min: f32,
    /// Largest value seen, `-∞` if none.
    pub max: f32,
    /// Sum in encounter order.
    pub sum: f32,
    /// Number of values seen.
    pub count: usize,
    /// Number of values flagged as anomalous by the caller.
    pub anomaly_count: usize,
}

impl AggregateStats {
    /// Stats before any sample: sentinel extremes that any finite sample replaces.
    pub const EMPTY: AggregateStats = AggregateStats {
        min: f32::INFINITY,
        max: f32::NEG_INFINITY,
        sum: 0.0,
        count: 0,
        anomaly_count: 0,
    };

    /// Fold one sample in.
    #[inline]
    pub fn push(&mut self, value: f32) {
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
        self.sum += value;
        self.count += 1;
    }

    /// Arithmetic mean, or `None` when no sample was seen.
    pub fn mean(&self) -> Option<f32> {
        (self.count > 0).then(|| self.sum / self.count as f32)
    }

    /// Fraction of samples flagged anomalous, in `[0, 1]`.
    pub fn anomaly_rate(&self) -> f32 {
        if self.count == 0 {
            0.0
        } else {
            self.anomaly_count as f32 / self.count as f32
        }
    }

    /// Width of the observed range, or `None` when empty.
    pub fn range(&self) -> Option<f32> {
        (self.count > 0).then(|| self.max - self.min)
    }
}

impl Default for AggregateStats {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Single forward pass computing min, max, sum and count.
pub fn aggregate(values: &[f32]) -> AggregateStats {
    let mut stats = AggregateStats::EMPTY;
    for &v in values {
        stats.push(v);
    }
    stats
}

/// Count the elements for which `predicate` holds.
pub fn count_where<T>(values: &[T], mut predicate: impl FnMut(&T) -> bool) -> usize {
    values.iter().filter(|v| predicate(v)).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn aggregate_small() {
        let stats = aggregate(&[3.0, -1.0, 4.0, 1.0, 5.0]);
        assert_eq!(stats.min, -1.0);
        assert_eq!(stats.max, 5.0);
        assert_eq!(stats.sum, 12.0);
        assert_eq!(stats.count, 5);
        assert_eq!(stats.anomaly_count, 0);
        assert_eq!(stats.mean(), Some(2.4));
    }

    #[test]
    fn aggregate_empty_keeps_sentinels() {
        let stats = aggregate(&[]);
        assert_eq!(stats, AggregateStats::EMPTY);
        assert_eq!(stats.mean(), None);
        assert_eq!(stats.range(), None);
        assert_eq!(stats.anomaly_rate(), 0.0);
    }

    #[test]
    fn sentinels_give_way_to_large_samples() {
        let stats = aggregate(&[2.0e12]);
        assert_eq!(stats.min, 2.0e12);
        assert_eq!(stats.max, 2.0e12);
    }

    #[test]
    fn count_where_pairs() {
        let pairs = [(0.0f32, 150.0f32), (10.0, 12.0), (-90.0, 20.0)];
        let n = count_where(&pairs, |(filtered, raw)| (filtered - raw).abs() > 100.0);
        assert_eq!(n, 2);
    }

    proptest! {
        #[test]
        fn min_le_max(values in proptest::collection::vec(-1.0e6f32..1.0e6, 1..200)) {
            let stats = aggregate(&values);
            prop_assert!(stats.min <= stats.max);
            prop_assert_eq!(stats.count, values.len());
        }
    }
}
