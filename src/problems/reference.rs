//! The six-state reference instance.
//!
//! Drive `x0 = 2` to `0` in four stages on the grid
//! `{0, 1, 2, 0.2, 0.4, 1.2}`. The points `0.2`, `0.4` and `1.2` are
//! interpolated from their integer neighbours, and stage 1 excludes `0.2`.
//!
//! Expected result: path `2 -> 0.4 -> 0.4 -> 0.4 -> 0` with
//! `V[0][2] = 3.6896`.

use crate::builder::ProblemBuilder;
use crate::error::Result;
use crate::problem::ControlProblem;

pub const HORIZON: usize = 4;
pub const INITIAL_STATE: f64 = 2.0;
pub const TARGET_STATE: f64 = 0.0;
pub const STATES: [f64; 6] = [0.0, 1.0, 2.0, 0.2, 0.4, 1.2];
pub const INTERPOLATED: [f64; 3] = [0.2, 0.4, 1.2];
/// Stage 1 cannot be at 0.2.
pub const STAGE_ONE: [f64; 5] = [0.0, 1.0, 2.0, 0.4, 1.2];

pub fn reference_builder() -> ProblemBuilder {
    ProblemBuilder::new()
        .with_states(STATES)
        .with_interpolated(INTERPOLATED)
        .with_horizon(HORIZON)
        .with_initial_state(INITIAL_STATE)
        .with_target_state(TARGET_STATE)
        .with_controls(2.0, [-1.6, -0.8, 0.0])
        .with_controls(1.0, [-0.8, 0.0])
        .with_controls(0.0, [0.0])
        .with_controls(1.2, [0.0])
        .with_controls(0.4, [0.0])
        .with_controls(0.2, [0.0])
        .with_stage_domain(1, STAGE_ONE)
}

pub fn reference_problem() -> Result<ControlProblem> {
    reference_builder().build()
}
