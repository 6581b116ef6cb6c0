//! Forward greedy reconstruction of the optimal path.
//!
//! Starting at `x0`, each stage picks the candidate control whose successor
//! minimizes `stage_cost + V[k+1][successor]`, skipping successors outside
//! row `k + 1`'s domain or with infinite cost-to-go. The walk ends early,
//! without error, when a state has no controls or no feasible successor.

use crate::engine::next_state;
use crate::grid::StateId;
use crate::problem::ControlProblem;
use crate::table::ValueTable;
use crate::traits::ControlModel;
use serde::Serialize;

/// Why the forward walk stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Termination {
    /// All `K` stages were traversed.
    Horizon,
    /// The state reached at `stage` has no admissible controls. The forced
    /// drive on the last stage under `DriveToTarget` counts as one.
    NoControls { stage: usize },
    /// No control at `stage` leads to a feasible successor.
    NoFeasibleTransition { stage: usize },
}

/// Reconstructed path and its cost.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OptimalPath {
    /// Visited states, starting with `x0`; at most `K + 1` entries.
    pub states: Vec<f64>,
    /// Control applied between `states[i]` and `states[i + 1]`.
    pub controls: Vec<f64>,
    /// `V[0][x0]` from the value table.
    pub total_cost: f64,
    pub termination: Termination,
    #[serde(skip)]
    pub ids: Vec<StateId>,
}

impl OptimalPath {
    /// Number of states on the path.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Whether the walk made it through every stage.
    pub fn is_complete(&self) -> bool {
        self.termination == Termination::Horizon
    }

    /// Arrow-joined rendering, e.g. `2 -> 0.4 -> 0`.
    pub fn render(&self) -> String {
        self.states
            .iter()
            .map(|&x| crate::utils::fmt_state(x))
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

/// Read-only forward walk over a populated value table.
pub struct PathReconstructor<'a, M: ControlModel> {
    problem: &'a ControlProblem,
    model: &'a M,
    table: &'a ValueTable,
}

impl<'a, M: ControlModel> PathReconstructor<'a, M> {
    pub fn new(problem: &'a ControlProblem, model: &'a M, table: &'a ValueTable) -> Self {
        Self {
            problem,
            model,
            table,
        }
    }

    pub fn reconstruct(&self) -> OptimalPath {
        let problem = self.problem;
        let grid = problem.grid();
        let x0 = problem.initial_state();

        let mut ids = vec![x0];
        let mut controls = Vec::new();
        let mut termination = Termination::Horizon;
        let mut current = x0;

        for k in 0..problem.horizon() {
            if problem.candidate_controls(k, current).is_empty() {
                tracing::debug!(stage = k, state = grid.value(current), "no admissible controls");
                termination = Termination::NoControls { stage: k };
                break;
            }
            let Some((u, next)) = self.best_step(k, current) else {
                tracing::debug!(stage = k, state = grid.value(current), "no feasible successor");
                termination = Termination::NoFeasibleTransition { stage: k };
                break;
            };
            tracing::trace!(
                stage = k,
                from = grid.value(current),
                control = u,
                to = grid.value(next),
                "path step"
            );
            controls.push(u);
            ids.push(next);
            current = next;
        }

        OptimalPath {
            states: ids.iter().map(|&id| grid.value(id)).collect(),
            controls,
            total_cost: self.table.cost_to_go(0, x0),
            termination,
            ids,
        }
    }

    /// Cheapest feasible `(control, successor)` out of `state` at stage `k`;
    /// the first candidate wins ties.
    fn best_step(&self, k: usize, state: StateId) -> Option<(f64, StateId)> {
        let next_row = self.table.stage(k + 1)?;
        let x = self.problem.grid().value(state);
        let mut best: Option<(f64, StateId, f64)> = None;
        for &u in self.problem.candidate_controls(k, state).iter() {
            let to = next_state(self.problem, self.model, state, u);
            let Some(tail) = next_row.get(to).filter(|v| v.is_finite()) else {
                continue;
            };
            let q = self.model.stage_cost(x, u) + tail;
            if best.is_none_or(|(_, _, b)| q < b) {
                best = Some((u, to, q));
            }
        }
        best.map(|(u, to, _)| (u, to))
    }
}

/// Sum of the stage costs actually paid along `path`.
///
/// Equals `path.total_cost` (up to rounding) for complete paths through
/// primary states; interpolated cost-to-go values are estimates, not costs
/// any control sequence realizes.
pub fn path_cost<M: ControlModel>(model: &M, path: &OptimalPath) -> f64 {
    path.states
        .iter()
        .zip(&path.controls)
        .map(|(&x, &u)| model.stage_cost(x, u))
        .sum()
}
