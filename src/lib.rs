//! Finite-horizon optimal control by backward dynamic programming.
//!
//! This crate computes an optimal control trajectory for a scalar system on a
//! small discrete state grid over a fixed number of stages.
//!
//! ## Core idea
//! 1. Describe the instance with a [`ProblemBuilder`] (or a TOML file, see
//!    [`config`]): admissible states, controls per state, horizon, initial and
//!    target states, optional per-stage reachability restrictions.
//! 2. [`ValueEngine`] fills the value table `V[k][x]` back to front, from the
//!    terminal stage (`V[K][target] = 0`) down to stage 0.
//! 3. The [`PathReconstructor`] walks forward from `x0`, choosing at each stage
//!    the control with the cheapest `stage_cost + V[k+1][x']`.
//!
//! Successors are snapped onto the nearest admissible state. States marked as
//! *interpolated* take their cost-to-go from the primary states bracketing
//! them instead of minimizing directly.
//!
//! ## Quick start
//! ```
//! use dp_control::{problems::reference, report::TextReport, ValueEngine};
//!
//! let problem = reference::reference_problem()?;
//! let solution = ValueEngine::new(problem).run();
//! assert_eq!(solution.path().states, vec![2.0, 0.4, 0.4, 0.4, 0.0]);
//! assert!((solution.cost() - 3.6896).abs() < 1e-9);
//! println!("{}", TextReport::new(&solution));
//! # Ok::<(), dp_control::ConfigError>(())
//! ```

pub mod builder;
pub mod config;
pub mod engine;
pub mod error;
pub mod grid;
pub mod problem;
pub mod problems;
pub mod reconstruct;
pub mod report;
pub mod table;
pub mod traits;
pub mod utils;

pub use crate::builder::ProblemBuilder;
pub use crate::engine::{Solution, ValueEngine};
pub use crate::error::{ConfigError, LoadError};
pub use crate::grid::{StateGrid, StateId};
pub use crate::problem::{ControlProblem, TerminalRule};
pub use crate::reconstruct::{path_cost, OptimalPath, PathReconstructor, Termination};
pub use crate::table::{StageValues, ValueTable};
pub use crate::traits::{ControlModel, ScalarQuadratic};
