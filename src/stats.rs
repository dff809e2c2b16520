#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

//! Streaming statistics accumulation

/// Streaming accumulator for count, mean and max
///
/// O(1) per update, retains no raw samples. Mean and max are undefined until
/// the first value is added; `mean()` and `max()` return `None` in that state
/// so callers cannot format a sentinel by accident.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunningStats {
    /// Number of values folded in
    count: u64,

    /// Running sum of all values
    sum: f64,

    /// Largest value seen (meaningful only when count > 0)
    max: f64,
}

impl RunningStats {
    /// Create an empty accumulator
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one value into the accumulator
    ///
    /// Callers are expected to filter non-finite values before adding.
    pub fn add(&mut self, value: f64) {
        self.max = if self.count == 0 {
            value
        } else {
            self.max.max(value)
        };
        self.count += 1;
        self.sum += value;
    }

    /// Number of values folded in
    #[must_use]
    pub const fn count(&self) -> u64 {
        self.count
    }

    /// Whether no values have been added yet
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Arithmetic mean of all values, `None` while empty
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // sample counts stay far below 2^52
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }

    /// Maximum of all values, `None` while empty
    #[must_use]
    pub fn max(&self) -> Option<f64> {
        (self.count > 0).then_some(self.max)
    }

    /// Clear the accumulator back to empty
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
