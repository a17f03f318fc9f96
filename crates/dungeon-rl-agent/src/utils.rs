//! Exploration schedule and small statistics helpers

use serde::{Deserialize, Serialize};

/// Multiplicative per-episode decay toward a floor
///
/// `rate` never increases: each [`ExplorationSchedule::decay`] multiplies it
/// by `decay_rate` and clamps it at `min_value`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExplorationSchedule {
    /// Starting value
    pub start: f64,
    /// Minimum value
    pub min_value: f64,
    /// Decay rate
    pub decay_rate: f64,
    rate: f64,
}

impl ExplorationSchedule {
    /// Create a new schedule positioned at `start`
    #[must_use]
    pub fn new(start: f64, min_value: f64, decay_rate: f64) -> Self {
        Self {
            start,
            min_value,
            decay_rate,
            rate: start,
        }
    }

    /// Current exploration rate
    #[must_use]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Apply one episode of decay and return the new rate
    pub fn decay(&mut self) -> f64 {
        self.rate = self.min_value.max(self.rate * self.decay_rate);
        self.rate
    }

    /// Rate after `episodes` decays from `start`
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn value_at(&self, episodes: usize) -> f64 {
        let value = self.start * self.decay_rate.powf(episodes as f64);
        value.max(self.min_value)
    }
}

/// Trailing moving average over `window` values
///
/// Returns one value per full window, like a "valid" convolution.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn moving_average(values: &[f64], window: usize) -> Vec<f64> {
    if window == 0 || values.len() < window {
        return Vec::new();
    }
    values
        .windows(window)
        .map(|w| w.iter().sum::<f64>() / window as f64)
        .collect()
}
