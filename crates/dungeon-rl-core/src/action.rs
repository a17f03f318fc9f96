//! Agent actions and the discrete action space

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{DungeonError, Result};

/// One of the four cardinal moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Move to `y - 1`
    Up,
    /// Move to `y + 1`
    Down,
    /// Move to `x - 1`
    Left,
    /// Move to `x + 1`
    Right,
}

impl Action {
    /// Number of actions
    pub const COUNT: usize = 4;

    /// All actions, ordered by index
    pub const ALL: [Action; Self::COUNT] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Dense index used by value tables
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Unit vector `(dx, dy)` of the move
    #[must_use]
    pub fn delta(self) -> (isize, isize) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    /// Arrow used when printing policies
    #[must_use]
    pub fn arrow(self) -> char {
        match self {
            Self::Up => '^',
            Self::Down => 'v',
            Self::Left => '<',
            Self::Right => '>',
        }
    }
}

impl TryFrom<usize> for Action {
    type Error = DungeonError;

    fn try_from(index: usize) -> Result<Self> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(DungeonError::InvalidAction(index))
    }
}

impl From<Action> for usize {
    fn from(action: Action) -> Self {
        action.index()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        };
        f.write_str(name)
    }
}

/// Discrete action space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscreteSpace {
    /// Number of discrete actions
    pub n: usize,
}

impl DiscreteSpace {
    /// Create a new discrete action space
    #[must_use]
    pub fn new(n: usize) -> Self {
        Self { n }
    }

    /// Sample a uniformly random index
    pub fn sample<R: Rng>(&self, rng: &mut R) -> usize {
        rng.gen_range(0..self.n)
    }

    /// Check if an index is valid within this space
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        index < self.n
    }
}

impl Default for DiscreteSpace {
    fn default() -> Self {
        Self::new(Action::COUNT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_index_round_trip() {
        for (index, action) in Action::ALL.iter().enumerate() {
            assert_eq!(action.index(), index);
            assert_eq!(Action::try_from(index).unwrap(), *action);
        }
        assert!(matches!(Action::try_from(4), Err(DungeonError::InvalidAction(4))));
    }

    #[test]
    fn test_deltas_are_unit_vectors() {
        assert_eq!(Action::Up.delta(), (0, -1));
        assert_eq!(Action::Down.delta(), (0, 1));
        assert_eq!(Action::Left.delta(), (-1, 0));
        assert_eq!(Action::Right.delta(), (1, 0));
    }

    #[test]
    fn test_sample_stays_in_space() {
        let space = DiscreteSpace::default();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            assert!(space.contains(space.sample(&mut rng)));
        }
        assert!(!space.contains(4));
    }
}
