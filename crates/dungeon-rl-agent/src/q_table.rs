//! Dense state-action value table

use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use dungeon_rl_core::Action;

/// `states × actions` table of value estimates, zero-initialized
///
/// State and action indices are trusted; an index outside the table is a
/// caller bug and panics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QTable {
    values: Array2<f64>,
}

impl QTable {
    /// Create an all-zero table
    #[must_use]
    pub fn new(states: usize, actions: usize) -> Self {
        Self {
            values: Array2::zeros((states, actions)),
        }
    }

    /// Number of states
    #[must_use]
    pub fn states(&self) -> usize {
        self.values.nrows()
    }

    /// Number of actions
    #[must_use]
    pub fn actions(&self) -> usize {
        self.values.ncols()
    }

    /// Value of `(state, action)`
    #[must_use]
    pub fn get(&self, state: usize, action: Action) -> f64 {
        self.values[[state, action.index()]]
    }

    /// Overwrite the value of `(state, action)`
    pub fn set(&mut self, state: usize, action: Action, value: f64) {
        self.values[[state, action.index()]] = value;
    }

    /// All action values of `state`
    #[must_use]
    pub fn row(&self, state: usize) -> ArrayView1<'_, f64> {
        self.values.row(state)
    }

    /// Largest action value of `state`
    #[must_use]
    pub fn max_value(&self, state: usize) -> f64 {
        self.row(state).fold(f64::NEG_INFINITY, |best, &v| best.max(v))
    }

    /// Highest-valued action of `state`, lowest index on ties
    #[must_use]
    pub fn greedy_action(&self, state: usize) -> Action {
        let mut best = Action::ALL[0];
        let mut best_value = self.get(state, best);
        for action in Action::ALL.into_iter().skip(1) {
            let value = self.get(state, action);
            if value > best_value {
                best = action;
                best_value = value;
            }
        }
        best
    }

    /// Raw table
    #[must_use]
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }
}
