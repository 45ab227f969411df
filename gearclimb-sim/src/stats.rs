//! Descriptive statistics over per-run counters.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::MIN_BATCH_RUNS;
use crate::numbers::{i128_to_f64, u64_to_f64, usize_to_f64};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StatsError {
    #[error("need at least {needed} samples, got {got}")]
    TooFewSamples { needed: usize, got: usize },
}

/// Welford accumulator for mean and sample variance.
#[derive(Debug, Default, Clone)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
}

impl RunningStats {
    pub fn add(&mut self, value: f64) {
        self.count += 1;
        let count = u64_to_f64(self.count);
        let delta = value - self.mean;
        self.mean += delta / count;
        let delta2 = value - self.mean;
        self.m2 += delta * delta2;
    }

    #[must_use]
    pub const fn count(&self) -> u64 {
        self.count
    }

    #[must_use]
    pub const fn mean(&self) -> f64 {
        if self.count == 0 { 0.0 } else { self.mean }
    }

    #[must_use]
    pub fn variance(&self) -> f64 {
        if self.count > 1 {
            self.m2 / u64_to_f64(self.count - 1)
        } else {
            0.0
        }
    }

    #[must_use]
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }
}

/// Median of already sorted samples; `None` when empty.
#[must_use]
pub fn median(sorted: &[u64]) -> Option<f64> {
    let len = sorted.len();
    if len == 0 {
        return None;
    }
    let mid = len / 2;
    if len % 2 == 1 {
        Some(u64_to_f64(sorted[mid]))
    } else {
        Some(f64::midpoint(u64_to_f64(sorted[mid - 1]), u64_to_f64(sorted[mid])))
    }
}

/// First, second and third quartile cut points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quartiles {
    pub q1: f64,
    pub q2: f64,
    pub q3: f64,
}

/// Quartiles of sorted samples using the exclusive method: cut point `i`
/// sits at position `i * (n + 1) / 4`, interpolated between neighbours and
/// clamped to the first and last pair.
///
/// # Errors
///
/// Returns [`StatsError::TooFewSamples`] for fewer than two samples.
pub fn quartiles(sorted: &[u64]) -> Result<Quartiles, StatsError> {
    const GROUPS: i128 = 4;
    let len = sorted.len();
    if len < MIN_BATCH_RUNS {
        return Err(StatsError::TooFewSamples {
            needed: MIN_BATCH_RUNS,
            got: len,
        });
    }
    let len_i = i128::try_from(len).unwrap_or(i128::MAX);
    let m = len_i + 1;
    let cut = |i: i128| -> f64 {
        let j = (i * m / GROUPS).clamp(1, len_i - 1);
        let delta = i * m - j * GROUPS;
        // j is within 1..len, so both indices are in bounds.
        let idx = usize::try_from(j).unwrap_or(1);
        let lower = u64_to_f64(sorted[idx - 1]);
        let upper = u64_to_f64(sorted[idx]);
        let (delta, groups) = (i128_to_f64(delta), i128_to_f64(GROUPS));
        (lower * (groups - delta) + upper * delta) / groups
    };
    Ok(Quartiles {
        q1: cut(1),
        q2: cut(2),
        q3: cut(3),
    })
}

/// Summary of one counter across a batch of runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    pub count: usize,
    pub total: u64,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: u64,
    pub max: u64,
    pub p25: f64,
    pub p75: f64,
}

impl Distribution {
    /// Summarize `samples` (any order).
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::TooFewSamples`] for fewer than two samples, where
    /// a sample standard deviation is undefined.
    pub fn from_samples(mut samples: Vec<u64>) -> Result<Self, StatsError> {
        if samples.len() < MIN_BATCH_RUNS {
            return Err(StatsError::TooFewSamples {
                needed: MIN_BATCH_RUNS,
                got: samples.len(),
            });
        }
        samples.sort_unstable();

        let mut running = RunningStats::default();
        let mut total = 0u64;
        for &value in &samples {
            running.add(u64_to_f64(value));
            total = total.saturating_add(value);
        }
        let cuts = quartiles(&samples)?;

        Ok(Self {
            count: samples.len(),
            total,
            mean: running.mean(),
            median: median(&samples).unwrap_or(cuts.q2),
            std_dev: running.std_dev(),
            min: samples[0],
            max: samples[samples.len() - 1],
            p25: cuts.q1,
            p75: cuts.q3,
        })
    }
}

/// Ratio of two totals, 0.0 when the denominator is zero.
#[must_use]
pub fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        u64_to_f64(numerator) / u64_to_f64(denominator)
    }
}

/// Mean of a slice of small integers, 0.0 when empty.
#[must_use]
pub fn mean_u32(values: &[u32]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let total: u64 = values.iter().copied().map(u64::from).sum();
    u64_to_f64(total) / usize_to_f64(values.len())
}
