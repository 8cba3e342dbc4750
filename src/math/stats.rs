//! Robust statistical primitives.
//!
//! Note: Functions may reorder the input slice. Empty input yields NaN,
//! never zero.

pub fn median(values: &mut [f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let n = values.len();
    if n % 2 == 1 {
        values[n / 2]
    } else {
        let a = values[n / 2 - 1];
        let b = values[n / 2];
        (a + b) / 2.0
    }
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Running mean/variance over the finite samples pushed into it.
///
/// NaN samples are counted as missing instead of poisoning the result, and
/// an accumulator that never saw a valid sample reports NaN for every
/// moment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidAccumulator {
    n_valid: usize,
    n_missing: usize,
    mean: f64,
    m2: f64,
}

impl ValidAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, x: f64) {
        if !x.is_finite() {
            self.n_missing += 1;
            return;
        }
        self.n_valid += 1;
        let delta = x - self.mean;
        self.mean += delta / self.n_valid as f64;
        self.m2 += delta * (x - self.mean);
    }

    pub fn n_valid(&self) -> usize {
        self.n_valid
    }

    pub fn n_missing(&self) -> usize {
        self.n_missing
    }

    pub fn mean(&self) -> f64 {
        if self.n_valid == 0 {
            f64::NAN
        } else {
            self.mean
        }
    }

    /// Population standard deviation (ddof = 0).
    pub fn std(&self) -> f64 {
        if self.n_valid == 0 {
            return f64::NAN;
        }
        (self.m2 / self.n_valid as f64).max(0.0).sqrt()
    }

    pub fn sem(&self) -> f64 {
        if self.n_valid == 0 {
            return f64::NAN;
        }
        self.std() / (self.n_valid as f64).sqrt()
    }
}
