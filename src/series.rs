// Bounded time series with overwrite-oldest eviction, plus sparkline normalization.

use std::collections::VecDeque;

/// Samples kept per metric unless configured otherwise.
pub const DEFAULT_CAPACITY: usize = 20;

/// Fixed-capacity, insertion-ordered sequence of samples.
/// Appending past capacity evicts the oldest sample.
#[derive(Debug, Clone)]
pub struct TimeSeriesBuffer {
    capacity: usize,
    values: VecDeque<f64>,
}

impl Default for TimeSeriesBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl TimeSeriesBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            values: VecDeque::with_capacity(capacity.saturating_add(1)),
        }
    }

    pub fn append(&mut self, value: f64) {
        self.values.push_back(value);
        while self.values.len() > self.capacity {
            self.values.pop_front();
        }
    }

    /// Samples oldest first.
    pub fn values(&self) -> impl ExactSizeIterator<Item = f64> + '_ {
        self.values.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.values.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn latest(&self) -> Option<f64> {
        self.values.back().copied()
    }
}

/// Min/max-normalizes `values` into [0, 1]: `(v - min) / (max - min)`.
/// A flat series uses a range of 1, so every point maps to 0.
pub fn normalize(values: &[f64]) -> Vec<f64> {
    let Some((min, max)) = min_max(values) else {
        return Vec::new();
    };
    let range = if max > min { max - min } else { 1.0 };
    values.iter().map(|v| (v - min) / range).collect()
}

fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let first = *values.first()?;
    Some(
        values
            .iter()
            .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
    )
}
