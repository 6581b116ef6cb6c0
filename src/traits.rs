//! Core trait definitions for the controlled system.
//!
//! The engine never hard-codes the plant. It asks a [`ControlModel`] for the
//! raw successor of a state under a control and for the cost of one stage,
//! then snaps the successor back onto the grid itself.
//!
//! [`ScalarQuadratic`] is the model used throughout the crate: a pure
//! integrator `x + u` with quadratic cost on both state and control.

/// Dynamics and per-stage cost of a scalar controlled system.
///
/// Implementations must be deterministic: the engine and the path
/// reconstructor evaluate the same transitions independently and rely on
/// getting identical answers.
pub trait ControlModel {
    /// Raw successor of `state` under `control`, before snapping onto the grid.
    fn dynamics(&self, state: f64, control: f64) -> f64;

    /// Cost paid for applying `control` in `state` for one stage.
    fn stage_cost(&self, state: f64, control: f64) -> f64;
}

/// `x' = x + u`, `cost(x, u) = 0.5 (x² + u²)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScalarQuadratic;

impl ControlModel for ScalarQuadratic {
    #[inline]
    fn dynamics(&self, state: f64, control: f64) -> f64 {
        state + control
    }

    #[inline]
    fn stage_cost(&self, state: f64, control: f64) -> f64 {
        0.5 * (state * state + control * control)
    }
}
