//! Reward signal

use serde::{Deserialize, Serialize};

/// Reward signal from a single transition
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Reward(pub f64);

impl Reward {
    /// Get the reward value
    #[must_use]
    pub fn value(&self) -> f64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_bare_number() {
        let reward = Reward(-1.5);
        assert_eq!(reward.value(), -1.5);
        assert_eq!(serde_json::to_string(&reward).unwrap(), "-1.5");
        assert_eq!(Reward::default().value(), 0.0);
    }
}
