//! A validated finite-horizon control problem.
//!
//! [`ControlProblem`] is only constructed through
//! [`ProblemBuilder`](crate::builder::ProblemBuilder), so every instance
//! satisfies the structural invariants the engine relies on:
//! - stage 0 contains only the initial state,
//! - the terminal stage `K` contains only the target,
//! - every interpolated state is bracketed by primary states.

use crate::grid::{StateGrid, StateId};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// How the last non-terminal stage (`K - 1`) chooses its control.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalRule {
    /// Ignore the control list and apply `u = target - x`, landing on the
    /// target in one step.
    #[default]
    DriveToTarget,
    /// Use the state's admissible controls like any other stage; only
    /// controls that snap onto the target are feasible.
    FreeControls,
}

/// A validated finite-horizon control instance, built by `ProblemBuilder`.
#[derive(Clone, Debug)]
pub struct ControlProblem {
    pub(crate) grid: StateGrid,
    pub(crate) horizon: usize,
    pub(crate) initial: StateId,
    pub(crate) target: StateId,
    /// controls[x] = admissible controls of state x, in configured order.
    pub(crate) controls: Vec<Vec<f64>>,
    /// domains[k] = states valid at stage k, in grid order.
    pub(crate) domains: Vec<Vec<StateId>>,
    /// brackets[x] = nearest primary states below and above an interpolated x.
    pub(crate) brackets: Vec<Option<(StateId, StateId)>>,
    pub(crate) terminal_rule: TerminalRule,
}

impl ControlProblem {
    pub fn grid(&self) -> &StateGrid {
        &self.grid
    }

    /// Horizon length `K`; stages run over `0..=K`.
    pub fn horizon(&self) -> usize {
        self.horizon
    }

    pub fn initial_state(&self) -> StateId {
        self.initial
    }

    pub fn target_state(&self) -> StateId {
        self.target
    }

    pub fn terminal_rule(&self) -> TerminalRule {
        self.terminal_rule
    }

    /// Configured admissible controls of `state` (possibly empty).
    pub fn controls(&self, state: StateId) -> &[f64] {
        &self.controls[state.0]
    }

    /// States valid at `stage`.
    ///
    /// # Panics
    /// Panics if `stage > horizon`.
    pub fn domain(&self, stage: usize) -> &[StateId] {
        &self.domains[stage]
    }

    /// Whether `state` takes its cost-to-go by interpolation instead of
    /// direct minimization.
    pub fn is_interpolated(&self, state: StateId) -> bool {
        self.brackets[state.0].is_some()
    }

    /// Bracketing primary states `(a, b)` of an interpolated state.
    pub fn bracket(&self, state: StateId) -> Option<(StateId, StateId)> {
        self.brackets[state.0]
    }

    /// True for the stage whose control is forced toward the target.
    pub fn is_terminal_approach(&self, stage: usize) -> bool {
        self.terminal_rule == TerminalRule::DriveToTarget && stage + 1 == self.horizon
    }

    /// Controls evaluated for `state` at `stage`.
    ///
    /// On the terminal-approach stage this is the single control
    /// `target - x`, regardless of the configured list.
    pub fn candidate_controls(&self, stage: usize, state: StateId) -> Cow<'_, [f64]> {
        if self.is_terminal_approach(stage) {
            let u = self.grid.value(self.target) - self.grid.value(state);
            Cow::Owned(vec![u])
        } else {
            Cow::Borrowed(self.controls(state))
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::builder::ProblemBuilder;
    use crate::problem::TerminalRule;

    #[test]
    fn terminal_approach_forces_the_drive_control() {
        let problem = ProblemBuilder::new()
            .with_states([0.0, 1.0, 2.0])
            .with_horizon(3)
            .with_initial_state(2.0)
            .with_target_state(0.0)
            .with_controls(2.0, [-1.0, 0.0])
            .build()
            .unwrap();
        let two = problem.grid().find(2.0).unwrap();
        assert!(!problem.is_terminal_approach(1));
        assert!(problem.is_terminal_approach(2));
        assert_eq!(&*problem.candidate_controls(1, two), &[-1.0, 0.0]);
        assert_eq!(&*problem.candidate_controls(2, two), &[-2.0]);
    }

    #[test]
    fn free_controls_rule_never_forces() {
        let problem = ProblemBuilder::new()
            .with_states([0.0, 1.0])
            .with_horizon(2)
            .with_initial_state(1.0)
            .with_target_state(0.0)
            .with_controls(1.0, [0.0])
            .with_terminal_rule(TerminalRule::FreeControls)
            .build()
            .unwrap();
        let one = problem.grid().find(1.0).unwrap();
        assert!(!problem.is_terminal_approach(1));
        assert_eq!(&*problem.candidate_controls(1, one), &[0.0]);
    }
}
