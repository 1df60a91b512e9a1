//! Running statistics collected during calibration phases

/// Running sum and raw maximum of the rest phase
///
/// The sum is kept in `f64` so a constant input averages back to exactly
/// that input.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RestAccumulator {
    sum: f64,
    peak: f32,
    count: u32,
}

impl RestAccumulator {
    /// Empty accumulator; the peak starts at zero
    pub const fn new() -> Self {
        Self { sum: 0.0, peak: 0.0, count: 0 }
    }

    /// Add one magnitude
    pub fn add(&mut self, magnitude: f32) {
        if magnitude > self.peak {
            self.peak = magnitude;
        }
        self.sum += f64::from(magnitude);
        self.count = self.count.saturating_add(1);
    }

    /// Mean of everything added so far, 0 when empty
    pub fn average(&self) -> f32 {
        if self.count == 0 {
            return 0.0;
        }
        (self.sum / f64::from(self.count)) as f32
    }

    /// Largest magnitude seen, unsmoothed
    pub fn peak(&self) -> f32 {
        self.peak
    }

    /// Number of magnitudes added
    pub fn count(&self) -> u32 {
        self.count
    }
}

/// Exponentially smoothed running maximum
///
/// A new magnitude above the current value moves it halfway there:
/// `peak = (magnitude + peak) / 2`. One hard outlier cannot drag the
/// estimate all the way up; repeated high readings converge on it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothedPeak {
    value: f32,
}

impl SmoothedPeak {
    /// Start smoothing from `seed`
    pub const fn starting_at(seed: f32) -> Self {
        Self { value: seed }
    }

    /// Fold in one magnitude
    pub fn update(&mut self, magnitude: f32) {
        if magnitude > self.value {
            self.value = (magnitude + self.value) / 2.0;
        }
    }

    /// Current smoothed maximum
    pub fn value(&self) -> f32 {
        self.value
    }
}
