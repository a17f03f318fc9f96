//! Action selection and greedy policy snapshots

use rand::Rng;
use std::fmt;

use dungeon_rl_core::{Action, DiscreteSpace, Position};

use crate::QTable;

/// Epsilon-greedy choice over one state's values
///
/// With probability `epsilon` a uniformly random action, otherwise the
/// greedy action with lowest-index tie breaking. `epsilon <= 0` never
/// touches `rng`.
pub fn epsilon_greedy<R: Rng>(table: &QTable, state: usize, epsilon: f64, rng: &mut R) -> Action {
    if epsilon > 0.0 && rng.gen::<f64>() < epsilon {
        let index = DiscreteSpace::new(table.actions()).sample(rng);
        Action::ALL[index]
    } else {
        table.greedy_action(state)
    }
}

/// One cell of a policy snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyCell {
    /// Impassable, no action
    Wall,
    /// Terminal, no action
    Goal,
    /// Greedy action of the cell
    Act(Action),
}

impl PolicyCell {
    /// Display symbol: `#`, `G` or an arrow
    #[must_use]
    pub fn symbol(self) -> char {
        match self {
            Self::Wall => '#',
            Self::Goal => 'G',
            Self::Act(action) => action.arrow(),
        }
    }
}

/// Greedy action of every cell, for inspection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyGrid {
    width: usize,
    height: usize,
    cells: Vec<PolicyCell>,
}

impl PolicyGrid {
    pub(crate) fn new(width: usize, height: usize, cells: Vec<PolicyCell>) -> Self {
        debug_assert_eq!(cells.len(), width * height);
        Self { width, height, cells }
    }

    /// Number of columns
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Cell at `position`
    #[must_use]
    pub fn get(&self, position: Position) -> Option<PolicyCell> {
        if position.x < self.width && position.y < self.height {
            Some(self.cells[position.y * self.width + position.x])
        } else {
            None
        }
    }

    /// Greedy action at `position`, `None` for walls, the goal or outside
    #[must_use]
    pub fn action_at(&self, position: Position) -> Option<Action> {
        match self.get(position)? {
            PolicyCell::Act(action) => Some(action),
            PolicyCell::Wall | PolicyCell::Goal => None,
        }
    }
}

impl fmt::Display for PolicyGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.cells.chunks(self.width.max(1)).enumerate() {
            if y > 0 {
                f.write_str("\n")?;
            }
            for (x, cell) in row.iter().enumerate() {
                if x > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{}", cell.symbol())?;
            }
        }
        Ok(())
    }
}
