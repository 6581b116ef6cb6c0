//! TOML problem definitions.
//!
//! ```toml
//! horizon = 4
//! initial_state = 2.0
//! target_state = 0.0
//! states = [0.0, 1.0, 2.0, 0.2, 0.4, 1.2]
//! interpolated = [0.2, 0.4, 1.2]
//! terminal_rule = "drive_to_target"
//!
//! [[controls]]
//! state = 2.0
//! values = [-1.6, -0.8, 0.0]
//!
//! [[stage_domains]]
//! stage = 1
//! states = [0.0, 1.0, 2.0, 0.4, 1.2]
//! ```

use crate::builder::ProblemBuilder;
use crate::error::{ConfigError, LoadError};
use crate::problem::{ControlProblem, TerminalRule};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProblemConfig {
    pub horizon: usize,
    pub initial_state: f64,
    pub target_state: f64,
    pub states: Vec<f64>,
    #[serde(default)]
    pub interpolated: Vec<f64>,
    #[serde(default)]
    pub terminal_rule: TerminalRule,
    #[serde(default)]
    pub controls: Vec<ControlEntry>,
    #[serde(default)]
    pub stage_domains: Vec<StageDomain>,
}

/// Admissible controls of one state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ControlEntry {
    pub state: f64,
    pub values: Vec<f64>,
}

/// Reachability restriction for one intermediate stage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StageDomain {
    pub stage: usize,
    pub states: Vec<f64>,
}

impl ProblemConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, LoadError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded problem file");
        Self::from_toml_str(&raw)
    }

    pub fn builder(&self) -> ProblemBuilder {
        let mut builder = ProblemBuilder::new()
            .with_states(self.states.iter().copied())
            .with_interpolated(self.interpolated.iter().copied())
            .with_horizon(self.horizon)
            .with_initial_state(self.initial_state)
            .with_target_state(self.target_state)
            .with_terminal_rule(self.terminal_rule);
        for entry in &self.controls {
            builder = builder.with_controls(entry.state, entry.values.iter().copied());
        }
        for domain in &self.stage_domains {
            builder = builder.with_stage_domain(domain.stage, domain.states.iter().copied());
        }
        builder
    }

    pub fn into_problem(self) -> Result<ControlProblem, ConfigError> {
        self.builder().build()
    }
}

/// Read, parse and validate a problem file in one step.
pub fn load_problem(path: impl AsRef<Path>) -> Result<ControlProblem, LoadError> {
    Ok(ProblemConfig::load(path)?.into_problem()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
horizon = 2
initial_state = 1.0
target_state = 0.0
states = [0.0, 1.0]

[[controls]]
state = 1.0
values = [-1.0, 0.0]
"#;

    #[test]
    fn optional_sections_default() {
        let cfg = ProblemConfig::from_toml_str(MINIMAL).unwrap();
        assert!(cfg.interpolated.is_empty());
        assert!(cfg.stage_domains.is_empty());
        assert_eq!(cfg.terminal_rule, TerminalRule::DriveToTarget);
        let problem = cfg.into_problem().unwrap();
        assert_eq!(problem.horizon(), 2);
        assert_eq!(problem.controls(problem.initial_state()), &[-1.0, 0.0]);
    }

    #[test]
    fn terminal_rule_is_snake_case() {
        let raw = format!("terminal_rule = \"free_controls\"\n{MINIMAL}");
        let cfg = ProblemConfig::from_toml_str(&raw).unwrap();
        assert_eq!(cfg.terminal_rule, TerminalRule::FreeControls);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let raw = format!("discount = 0.9\n{MINIMAL}");
        assert!(matches!(
            ProblemConfig::from_toml_str(&raw),
            Err(LoadError::Parse(_))
        ));
    }

    #[test]
    fn semantic_errors_surface_as_config_errors() {
        let raw = MINIMAL.replace("initial_state = 1.0", "initial_state = 4.0");
        let err = ProblemConfig::from_toml_str(&raw)
            .unwrap()
            .into_problem()
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InadmissibleState {
                role: "initial state",
                value: 4.0
            }
        );
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_problem("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.toml"));
    }
}
