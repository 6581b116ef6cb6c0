//! Error types for problem construction and configuration loading.
//!
//! Everything that can go wrong is detected before the backward pass starts.
//! Once a [`ControlProblem`](crate::problem::ControlProblem) exists, solving it
//! cannot fail: missing table entries are treated as infeasible instead.

use std::path::PathBuf;

/// A malformed problem definition.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The admissible-state grid has no states.
    #[error("admissible state grid is empty")]
    EmptyGrid,
    /// A grid state is NaN or infinite.
    #[error("admissible states must be finite, got {0}")]
    NonFiniteState(f64),
    /// The same state appears twice in the grid.
    #[error("state {0} appears more than once in the grid")]
    DuplicateState(f64),
    /// A required builder field was never set.
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    /// The horizon must contain at least one transition.
    #[error("horizon must be at least 1")]
    ZeroHorizon,
    /// A value used in `role` is not one of the admissible states.
    #[error("{role} {value} is not an admissible state")]
    InadmissibleState {
        /// What the value was used for (initial state, stage domain, ...).
        role: &'static str,
        /// The offending value.
        value: f64,
    },
    /// Stage 0 may only contain the initial state.
    #[error("stage 0 domain must be exactly {{{initial}}}")]
    InvalidInitialDomain {
        /// The configured initial state.
        initial: f64,
    },
    /// The terminal stage always contains just the target.
    #[error("stage {stage} is terminal and cannot be overridden")]
    TerminalDomainOverride {
        /// The terminal stage index.
        stage: usize,
    },
    /// A domain override names a stage past the horizon.
    #[error("stage {stage} is outside the horizon 0..={horizon}")]
    StageOutOfRange {
        /// Requested stage.
        stage: usize,
        /// Configured horizon.
        horizon: usize,
    },
    /// Two domain overrides for the same stage.
    #[error("stage {0} has more than one domain override")]
    DuplicateDomainOverride(usize),
    /// Two control lists for the same state.
    #[error("state {0} has more than one control list")]
    DuplicateControls(f64),
    /// A control is NaN or infinite.
    #[error("control {control} for state {state} is not finite")]
    NonFiniteControl {
        /// State the control belongs to.
        state: f64,
        /// The offending control.
        control: f64,
    },
    /// An interpolated state needs primary states on both sides.
    #[error("interpolated state {0} is not bracketed by primary states")]
    UnboundedInterpolation(f64),
    /// The initial and target states must be primary grid points.
    #[error("{role} {value} cannot be an interpolated state")]
    InterpolatedEndpoint {
        /// Either "initial state" or "target state".
        role: &'static str,
        /// The offending value.
        value: f64,
    },
}

/// Failure to turn a configuration file into a problem.
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid TOML for a problem definition.
    #[error("invalid problem file: {0}")]
    Parse(#[from] toml::de::Error),
    /// The file parsed but describes an invalid problem.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Convenience result type for problem construction.
pub type Result<T> = std::result::Result<T, ConfigError>;
