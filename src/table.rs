//! The value table: one row of cost-to-go values per stage.
//!
//! A row has a slot for every grid state. A slot is either absent (the state
//! is not in that stage's domain) or holds a cost-to-go, where `+inf` marks a
//! state in the domain from which the target cannot be reached.

use crate::grid::StateId;

/// Cost-to-go values of a single stage `k`.
#[derive(Clone, Debug, PartialEq)]
pub struct StageValues {
    stage: usize,
    entries: Vec<Option<f64>>,
}

impl StageValues {
    /// A row whose domain entries all start out infeasible.
    pub(crate) fn with_domain(stage: usize, width: usize, domain: &[StateId]) -> Self {
        let mut entries = vec![None; width];
        for id in domain {
            entries[id.0] = Some(f64::INFINITY);
        }
        Self { stage, entries }
    }

    /// Stage index `k` of this row.
    #[inline]
    pub fn stage(&self) -> usize {
        self.stage
    }

    /// Whether `state` belongs to this stage's domain.
    #[inline]
    pub fn contains(&self, state: StateId) -> bool {
        matches!(self.entries.get(state.0), Some(Some(_)))
    }

    /// Stored value, or `None` when `state` is outside the domain.
    #[inline]
    pub fn get(&self, state: StateId) -> Option<f64> {
        self.entries.get(state.0).copied().flatten()
    }

    /// Stored value with absent states read as infeasible.
    #[inline]
    pub fn cost_to_go(&self, state: StateId) -> f64 {
        self.get(state).unwrap_or(f64::INFINITY)
    }

    /// Lower the entry to `candidate` if that improves it. Out-of-domain
    /// states are left untouched.
    pub(crate) fn relax(&mut self, state: StateId, candidate: f64) -> bool {
        match self.entries.get_mut(state.0) {
            Some(Some(v)) if candidate < *v => {
                *v = candidate;
                true
            }
            _ => false,
        }
    }

    /// Overwrite an in-domain entry.
    pub(crate) fn set(&mut self, state: StateId, value: f64) {
        if let Some(Some(v)) = self.entries.get_mut(state.0) {
            *v = value;
        }
    }

    /// In-domain entries, in grid order.
    pub fn iter(&self) -> impl Iterator<Item = (StateId, f64)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.map(|v| (StateId(i), v)))
    }

    /// Number of states in the domain.
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|v| v.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of domain states with a finite cost-to-go.
    pub fn feasible_count(&self) -> usize {
        self.iter().filter(|(_, v)| v.is_finite()).count()
    }
}

/// Cost-to-go for every stage `0..=K`.
#[derive(Clone, Debug, PartialEq)]
pub struct ValueTable {
    stages: Vec<StageValues>,
}

impl ValueTable {
    /// Assemble a table from rows produced back to front (stage `K` first).
    pub(crate) fn from_backward_rows(mut rows: Vec<StageValues>) -> Self {
        rows.reverse();
        debug_assert!(rows.iter().enumerate().all(|(k, r)| r.stage == k));
        Self { stages: rows }
    }

    /// Horizon `K`.
    pub fn horizon(&self) -> usize {
        self.stages.len().saturating_sub(1)
    }

    /// Row for stage `k`, if `k <= K`.
    pub fn stage(&self, k: usize) -> Option<&StageValues> {
        self.stages.get(k)
    }

    pub fn get(&self, k: usize, state: StateId) -> Option<f64> {
        self.stage(k).and_then(|row| row.get(state))
    }

    /// Cost-to-go at `(k, state)`, `+inf` if absent.
    pub fn cost_to_go(&self, k: usize, state: StateId) -> f64 {
        self.get(k, state).unwrap_or(f64::INFINITY)
    }

    /// Rows in stage order.
    pub fn iter(&self) -> impl Iterator<Item = &StageValues> + '_ {
        self.stages.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_entries_read_as_infeasible() {
        let row = StageValues::with_domain(1, 4, &[StateId(0), StateId(2)]);
        assert!(row.contains(StateId(0)));
        assert!(!row.contains(StateId(1)));
        assert!(!row.contains(StateId(9)));
        assert_eq!(row.get(StateId(1)), None);
        assert_eq!(row.get(StateId(2)), Some(f64::INFINITY));
        assert_eq!(row.cost_to_go(StateId(1)), f64::INFINITY);
        assert_eq!(row.len(), 2);
        assert_eq!(row.feasible_count(), 0);
    }

    #[test]
    fn relax_keeps_the_minimum_and_ignores_outsiders() {
        let mut row = StageValues::with_domain(0, 3, &[StateId(1)]);
        assert!(row.relax(StateId(1), 5.0));
        assert!(!row.relax(StateId(1), 7.0));
        assert!(row.relax(StateId(1), 2.5));
        assert!(!row.relax(StateId(0), 1.0));
        assert_eq!(row.get(StateId(1)), Some(2.5));
        assert_eq!(row.get(StateId(0)), None);
        assert_eq!(row.feasible_count(), 1);
    }

    #[test]
    fn table_rows_come_out_in_stage_order() {
        let rows = vec![
            StageValues::with_domain(2, 2, &[StateId(0)]),
            StageValues::with_domain(1, 2, &[StateId(0), StateId(1)]),
            StageValues::with_domain(0, 2, &[StateId(1)]),
        ];
        let table = ValueTable::from_backward_rows(rows);
        assert_eq!(table.horizon(), 2);
        let stages: Vec<usize> = table.iter().map(StageValues::stage).collect();
        assert_eq!(stages, vec![0, 1, 2]);
        assert!(table.stage(3).is_none());
        assert_eq!(table.get(0, StateId(1)), Some(f64::INFINITY));
        assert_eq!(table.cost_to_go(0, StateId(0)), f64::INFINITY);
    }
}
