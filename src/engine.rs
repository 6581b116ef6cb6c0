//! Backward value iteration over the stage/state grid.
//!
//! The engine fills the [`ValueTable`] strictly back to front:
//! 1. Stage `K` holds only the target, at cost 0.
//! 2. For `k = K-1, …, 0` every primary state in the stage's domain is
//!    minimized over its candidate controls against row `k + 1`.
//! 3. A second pass over the same stage assigns interpolated states from the
//!    now-final primary values that bracket them.
//!
//! Lookups outside a row's domain count as infeasible, so a misconfigured
//! reachability restriction shows up as `+inf` rather than a failure.

use crate::grid::StateId;
use crate::problem::ControlProblem;
use crate::reconstruct::{OptimalPath, PathReconstructor};
use crate::table::{StageValues, ValueTable};
use crate::traits::{ControlModel, ScalarQuadratic};
use crate::utils::interpolate;
use serde::Serialize;
use std::sync::Arc;

/// One transition the engine evaluated while filling a stage.
///
/// This is the edge set a plotter draws: every `(k, x) -> (k + 1, x')` arc
/// labelled with its stage cost.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Transition {
    pub stage: usize,
    pub from: f64,
    pub control: f64,
    pub to: f64,
    pub stage_cost: f64,
}

/// Output of the backward pass.
#[derive(Clone, Debug)]
pub struct BackwardPass {
    pub table: ValueTable,
    pub transitions: Vec<Transition>,
}

/// Value-function engine for a problem instance and a control model.
///
/// Typical usage:
/// ```
/// use dp_control::{problems::reference, ValueEngine};
///
/// let engine = ValueEngine::new(reference::reference_problem()?);
/// let solution = engine.run();
/// println!("cost-to-go from x0: {:.2}", solution.cost());
/// assert_eq!(solution.path().states.first(), Some(&2.0));
/// # Ok::<(), dp_control::ConfigError>(())
/// ```
pub struct ValueEngine<M: ControlModel = ScalarQuadratic> {
    problem: Arc<ControlProblem>,
    model: M,
}

impl ValueEngine<ScalarQuadratic> {
    /// Engine using the quadratic integrator model.
    pub fn new(problem: ControlProblem) -> Self {
        Self::with_model(problem, ScalarQuadratic)
    }
}

impl<M: ControlModel> ValueEngine<M> {
    pub fn with_model(problem: ControlProblem, model: M) -> Self {
        Self::from_shared(Arc::new(problem), model)
    }

    /// Build an engine over a problem that is already shared elsewhere.
    pub fn from_shared(problem: Arc<ControlProblem>, model: M) -> Self {
        Self { problem, model }
    }

    pub fn problem(&self) -> &ControlProblem {
        &self.problem
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Grid state reached from `state` under `control`.
    pub fn next_state(&self, state: StateId, control: f64) -> StateId {
        next_state(&self.problem, &self.model, state, control)
    }

    /// Phase I: populate the value table for stages `K` down to `0`.
    pub fn build_value_table(&self) -> BackwardPass {
        let problem = &*self.problem;
        let horizon = problem.horizon();
        let mut transitions = Vec::new();
        let mut rows = Vec::with_capacity(horizon + 1);

        let mut next = self.terminal_row();
        for k in (0..horizon).rev() {
            let span = tracing::debug_span!("solve_stage", stage = k);
            let _enter = span.enter();
            let row = self.solve_stage(k, &next, &mut transitions);
            tracing::debug!(
                stage = k,
                domain = row.len(),
                feasible = row.feasible_count(),
                "stage complete"
            );
            rows.push(std::mem::replace(&mut next, row));
        }
        rows.push(next);

        BackwardPass {
            table: ValueTable::from_backward_rows(rows),
            transitions,
        }
    }

    /// Phase II: solve, then walk the optimal path forward from `x0`.
    pub fn run(&self) -> Solution {
        let BackwardPass { table, transitions } = self.build_value_table();
        let path = PathReconstructor::new(&self.problem, &self.model, &table).reconstruct();
        tracing::info!(
            cost = path.total_cost,
            steps = path.controls.len(),
            "optimal path reconstructed"
        );
        Solution {
            problem: Arc::clone(&self.problem),
            table,
            path,
            transitions,
        }
    }

    fn terminal_row(&self) -> StageValues {
        let problem = &*self.problem;
        let target = problem.target_state();
        let mut row = StageValues::with_domain(problem.horizon(), problem.grid().len(), &[target]);
        row.set(target, 0.0);
        row
    }

    fn solve_stage(
        &self,
        k: usize,
        next: &StageValues,
        transitions: &mut Vec<Transition>,
    ) -> StageValues {
        let problem = &*self.problem;
        let grid = problem.grid();
        let domain = problem.domain(k);
        let mut row = StageValues::with_domain(k, grid.len(), domain);
        let mut has_successor = vec![false; grid.len()];

        for &x in domain {
            let xv = grid.value(x);
            for &u in problem.candidate_controls(k, x).iter() {
                let to = self.next_state(x, u);
                let stage_cost = self.model.stage_cost(xv, u);
                transitions.push(Transition {
                    stage: k,
                    from: xv,
                    control: u,
                    to: grid.value(to),
                    stage_cost,
                });
                let tail = next.cost_to_go(to);
                if !tail.is_finite() {
                    tracing::trace!(
                        state = xv,
                        control = u,
                        next = grid.value(to),
                        "infeasible successor"
                    );
                    continue;
                }
                has_successor[x.0] = true;
                if !problem.is_interpolated(x) {
                    row.relax(x, stage_cost + tail);
                }
            }
        }

        // Interpolated states read only the finalized primary values above.
        for &x in domain {
            let Some((a, b)) = problem.bracket(x) else {
                continue;
            };
            if !has_successor[x.0] {
                continue;
            }
            let value = interpolate(
                grid.value(x),
                (grid.value(a), row.cost_to_go(a)),
                (grid.value(b), row.cost_to_go(b)),
            );
            row.set(x, value);
        }

        row
    }
}

/// Snap the model's raw successor onto the grid.
pub(crate) fn next_state<M: ControlModel>(
    problem: &ControlProblem,
    model: &M,
    state: StateId,
    control: f64,
) -> StateId {
    let grid = problem.grid();
    grid.snap(model.dynamics(grid.value(state), control))
}

/// Everything a solve produces.
#[derive(Clone, Debug)]
pub struct Solution {
    problem: Arc<ControlProblem>,
    table: ValueTable,
    path: OptimalPath,
    transitions: Vec<Transition>,
}

impl Solution {
    pub fn problem(&self) -> &ControlProblem {
        &self.problem
    }

    pub fn table(&self) -> &ValueTable {
        &self.table
    }

    pub fn path(&self) -> &OptimalPath {
        &self.path
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Minimum cost-to-go from the initial state, `V[0][x0]`.
    pub fn cost(&self) -> f64 {
        self.path.total_cost
    }

    /// `V[k][x]` looked up by state value; `None` if `x` is not admissible or
    /// not in stage `k`'s domain.
    pub fn value_at(&self, k: usize, x: f64) -> Option<f64> {
        let id = self.problem.grid().find(x)?;
        self.table.get(k, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ProblemBuilder;
    use crate::problem::TerminalRule;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn three_point() -> ProblemBuilder {
        ProblemBuilder::new()
            .with_states([0.0, 1.0, 2.0])
            .with_horizon(3)
            .with_initial_state(2.0)
            .with_target_state(0.0)
            .with_controls(2.0, [-2.0, -1.0, 0.0])
            .with_controls(1.0, [-1.0, 0.0])
            .with_controls(0.0, [0.0])
    }

    #[test]
    fn terminal_row_is_only_the_target() {
        let engine = ValueEngine::new(three_point().build().unwrap());
        let pass = engine.build_value_table();
        let last = pass.table.stage(3).unwrap();
        let entries: Vec<(StateId, f64)> = last.iter().collect();
        assert_eq!(entries, vec![(StateId(0), 0.0)]);
    }

    #[test]
    fn hand_computed_three_point_values() {
        let engine = ValueEngine::new(three_point().build().unwrap());
        let table = engine.build_value_table().table;
        // stage 2 drives straight to 0: cost x^2
        assert_eq!(table.get(2, StateId(1)), Some(1.0));
        assert_eq!(table.get(2, StateId(2)), Some(4.0));
        // stage 1, x = 1: min(1 + V2[0], 0.5 + V2[1]) = 1
        assert_eq!(table.get(1, StateId(1)), Some(1.0));
        // stage 1, x = 2: min(4 + 0, 2.5 + 1, 2 + 4) = 3.5
        assert_eq!(table.get(1, StateId(2)), Some(3.5));
        // stage 0, x = 2: min(4 + 0, 2.5 + 1, 2 + 3.5) = 3.5
        assert_eq!(table.get(0, StateId(2)), Some(3.5));
    }

    #[test]
    fn every_evaluated_arc_is_logged() {
        let engine = ValueEngine::new(three_point().build().unwrap());
        let pass = engine.build_value_table();
        // stage 2: one forced arc per state; stage 1: 1 + 2 + 3 arcs; stage 0: 3 arcs
        assert_eq!(pass.transitions.len(), 3 + 6 + 3);
        assert!(pass
            .transitions
            .iter()
            .filter(|t| t.stage == 2)
            .all(|t| t.to == 0.0));
    }

    #[test]
    fn free_controls_need_a_control_that_reaches_the_target() {
        let problem = three_point()
            .with_terminal_rule(TerminalRule::FreeControls)
            .build()
            .unwrap();
        let table = ValueEngine::new(problem).build_value_table().table;
        // from 2 the controls reach 0 directly
        assert_eq!(table.get(2, StateId(2)), Some(4.0));
        assert_eq!(table.get(2, StateId(1)), Some(1.0));
        assert_eq!(table.get(2, StateId(0)), Some(0.0));
    }

    #[test]
    fn states_without_controls_stay_infeasible() {
        let problem = ProblemBuilder::new()
            .with_states([0.0, 1.0, 3.0])
            .with_horizon(3)
            .with_initial_state(1.0)
            .with_target_state(0.0)
            .with_controls(1.0, [-1.0])
            .with_controls(0.0, [0.0])
            .build()
            .unwrap();
        let table = ValueEngine::new(problem).build_value_table().table;
        let three = StateId(2);
        assert_eq!(table.get(1, three), Some(f64::INFINITY));
        // forced drive on the last stage ignores the empty list
        assert_eq!(table.get(2, three), Some(9.0));
    }

    #[test]
    fn successors_outside_the_next_domain_are_infeasible() {
        let problem = three_point()
            .with_stage_domain(1, [2.0])
            .build()
            .unwrap();
        let table = ValueEngine::new(problem).build_value_table().table;
        // only u = 0 keeps 2 inside stage 1's domain
        assert!(close(table.cost_to_go(0, StateId(2)), 2.0 + 3.5));
    }

    #[test]
    fn interpolated_values_follow_the_bracketing_primaries() {
        let problem = three_point()
            .with_states([0.0, 1.0, 2.0, 1.5])
            .with_interpolated([1.5])
            .with_controls(1.5, [0.0])
            .build()
            .unwrap();
        let table = ValueEngine::new(problem).build_value_table().table;
        let mid = StateId(3);
        for k in 1..3 {
            let lo = table.cost_to_go(k, StateId(1));
            let hi = table.cost_to_go(k, StateId(2));
            assert!(close(table.cost_to_go(k, mid), lo + (hi - lo) * 0.5));
        }
    }
}
