//! The discretization grid: a fixed, ordered list of admissible states.
//!
//! States are real numbers, but everything downstream addresses them through
//! [`StateId`], the position of the state in the grid. The order in which the
//! states were given is preserved; it is the tie-break order for [`StateGrid::snap`].

use crate::error::{ConfigError, Result};
use serde::Serialize;
use std::fmt;

/// Index of a state in its [`StateGrid`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct StateId(pub usize);

impl StateId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Finite ordered set of admissible states.
#[derive(Clone, Debug, PartialEq)]
pub struct StateGrid {
    values: Vec<f64>,
}

impl StateGrid {
    /// Build a grid, rejecting empty, non-finite or duplicated state lists.
    pub fn new(values: Vec<f64>) -> Result<Self> {
        if values.is_empty() {
            return Err(ConfigError::EmptyGrid);
        }
        for (i, &x) in values.iter().enumerate() {
            if !x.is_finite() {
                return Err(ConfigError::NonFiniteState(x));
            }
            if values[..i].contains(&x) {
                return Err(ConfigError::DuplicateState(x));
            }
        }
        Ok(Self { values })
    }

    /// Number of admissible states.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false for a constructed grid; provided for API symmetry.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value of the state with the given id.
    ///
    /// # Panics
    /// Panics if `id` does not belong to this grid.
    #[inline]
    pub fn value(&self, id: StateId) -> f64 {
        self.values[id.0]
    }

    /// All state values, in grid order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// All state ids, in grid order.
    pub fn ids(&self) -> impl Iterator<Item = StateId> + '_ {
        (0..self.values.len()).map(StateId)
    }

    /// Exact lookup of an admissible state.
    pub fn find(&self, x: f64) -> Option<StateId> {
        self.values.iter().position(|&v| v == x).map(StateId)
    }

    /// Map a raw value onto the closest admissible state.
    ///
    /// Equidistant candidates resolve to the one that comes first in grid
    /// order. A NaN input snaps to the first state.
    pub fn snap(&self, x: f64) -> StateId {
        let mut best = 0usize;
        let mut best_dist = f64::INFINITY;
        for (i, &v) in self.values.iter().enumerate() {
            let dist = (v - x).abs();
            if dist < best_dist {
                best_dist = dist;
                best = i;
            }
        }
        StateId(best)
    }

    /// Ids sorted by ascending state value.
    pub fn ascending(&self, ids: impl IntoIterator<Item = StateId>) -> Vec<StateId> {
        let mut ids: Vec<StateId> = ids.into_iter().collect();
        ids.sort_by(|a, b| self.value(*a).total_cmp(&self.value(*b)));
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> StateGrid {
        StateGrid::new(vec![0.0, 1.0, 2.0, 0.2, 0.4, 1.2]).unwrap()
    }

    #[test]
    fn rejects_malformed_grids() {
        assert_eq!(StateGrid::new(vec![]), Err(ConfigError::EmptyGrid));
        assert_eq!(
            StateGrid::new(vec![0.0, f64::NAN]).unwrap_err().to_string(),
            "admissible states must be finite, got NaN"
        );
        assert_eq!(
            StateGrid::new(vec![1.0, 0.5, 1.0]),
            Err(ConfigError::DuplicateState(1.0))
        );
    }

    #[test]
    fn snap_picks_nearest_state() {
        let g = grid();
        // 2 - 1.6 lands a hair below 0.4
        assert_eq!(g.value(g.snap(2.0 - 1.6)), 0.4);
        assert_eq!(g.value(g.snap(2.0 - 0.8)), 1.2);
        assert_eq!(g.value(g.snap(1.0 - 0.8)), 0.2);
        assert_eq!(g.value(g.snap(-3.0)), 0.0);
        assert_eq!(g.value(g.snap(7.5)), 2.0);
    }

    #[test]
    fn snap_ties_go_to_first_in_grid_order() {
        let g = StateGrid::new(vec![1.0, 0.0]).unwrap();
        assert_eq!(g.snap(0.5), StateId(0));
        let g = StateGrid::new(vec![0.0, 1.0]).unwrap();
        assert_eq!(g.snap(0.5), StateId(0));
        let g = StateGrid::new(vec![2.0, 0.0, 1.0]).unwrap();
        assert_eq!(g.snap(1.5), StateId(0));
    }

    #[test]
    fn snap_is_idempotent_on_grid_states() {
        let g = grid();
        for id in g.ids() {
            assert_eq!(g.snap(g.value(id)), id);
        }
    }

    #[test]
    fn ascending_orders_by_value() {
        let g = grid();
        let sorted: Vec<f64> = g.ascending(g.ids()).into_iter().map(|id| g.value(id)).collect();
        assert_eq!(sorted, vec![0.0, 0.2, 0.4, 1.0, 1.2, 2.0]);
    }
}
