use crate::error::{ConfigError, Result};
use crate::grid::{StateGrid, StateId};
use crate::problem::{ControlProblem, TerminalRule};

/// Assembles and validates a [`ControlProblem`].
///
/// ```
/// use dp_control::ProblemBuilder;
///
/// let problem = ProblemBuilder::new()
///     .with_states([0.0, 1.0, 2.0, 0.5])
///     .with_interpolated([0.5])
///     .with_horizon(3)
///     .with_initial_state(2.0)
///     .with_target_state(0.0)
///     .with_controls(2.0, [-1.0, 0.0])
///     .with_controls(1.0, [-1.0, 0.0])
///     .build()?;
/// assert_eq!(problem.horizon(), 3);
/// # Ok::<(), dp_control::ConfigError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct ProblemBuilder {
    states: Vec<f64>,
    interpolated: Vec<f64>,
    horizon: Option<usize>,
    initial: Option<f64>,
    target: Option<f64>,
    controls: Vec<(f64, Vec<f64>)>,
    domains: Vec<(usize, Vec<f64>)>,
    terminal_rule: TerminalRule,
}

impl ProblemBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admissible states, in the order used for snap tie-breaks.
    pub fn with_states(mut self, states: impl IntoIterator<Item = f64>) -> Self {
        self.states = states.into_iter().collect();
        self
    }

    /// Grid states whose cost-to-go is interpolated from primary neighbours.
    pub fn with_interpolated(mut self, states: impl IntoIterator<Item = f64>) -> Self {
        self.interpolated = states.into_iter().collect();
        self
    }

    pub fn with_horizon(mut self, horizon: usize) -> Self {
        self.horizon = Some(horizon);
        self
    }

    pub fn with_initial_state(mut self, x0: f64) -> Self {
        self.initial = Some(x0);
        self
    }

    pub fn with_target_state(mut self, target: f64) -> Self {
        self.target = Some(target);
        self
    }

    /// Admissible controls of one state. States never given controls have none.
    pub fn with_controls(mut self, state: f64, controls: impl IntoIterator<Item = f64>) -> Self {
        self.controls.push((state, controls.into_iter().collect()));
        self
    }

    /// Restrict the states valid at an intermediate stage.
    pub fn with_stage_domain(mut self, stage: usize, states: impl IntoIterator<Item = f64>) -> Self {
        self.domains.push((stage, states.into_iter().collect()));
        self
    }

    pub fn with_terminal_rule(mut self, rule: TerminalRule) -> Self {
        self.terminal_rule = rule;
        self
    }

    pub fn build(self) -> Result<ControlProblem> {
        let grid = StateGrid::new(self.states)?;
        let horizon = self.horizon.ok_or(ConfigError::MissingField("horizon"))?;
        if horizon == 0 {
            return Err(ConfigError::ZeroHorizon);
        }
        let initial_value = self
            .initial
            .ok_or(ConfigError::MissingField("initial_state"))?;
        let target_value = self
            .target
            .ok_or(ConfigError::MissingField("target_state"))?;
        let initial = lookup(&grid, "initial state", initial_value)?;
        let target = lookup(&grid, "target state", target_value)?;

        let brackets = bracket_interpolated(&grid, &self.interpolated)?;
        if brackets[initial.0].is_some() {
            return Err(ConfigError::InterpolatedEndpoint {
                role: "initial state",
                value: initial_value,
            });
        }
        if brackets[target.0].is_some() {
            return Err(ConfigError::InterpolatedEndpoint {
                role: "target state",
                value: target_value,
            });
        }

        let mut controls: Vec<Option<Vec<f64>>> = vec![None; grid.len()];
        for (state, list) in self.controls {
            let id = lookup(&grid, "controlled state", state)?;
            if let Some(&control) = list.iter().find(|u| !u.is_finite()) {
                return Err(ConfigError::NonFiniteControl { state, control });
            }
            if controls[id.0].replace(list).is_some() {
                return Err(ConfigError::DuplicateControls(state));
            }
        }
        let controls = controls.into_iter().map(Option::unwrap_or_default).collect();

        let mut domains: Vec<Option<Vec<StateId>>> = vec![None; horizon + 1];
        domains[0] = Some(vec![initial]);
        domains[horizon] = Some(vec![target]);
        let mut overridden = vec![false; horizon + 1];
        for (stage, states) in self.domains {
            if stage > horizon {
                return Err(ConfigError::StageOutOfRange { stage, horizon });
            }
            if stage == horizon {
                return Err(ConfigError::TerminalDomainOverride { stage });
            }
            if std::mem::replace(&mut overridden[stage], true) {
                return Err(ConfigError::DuplicateDomainOverride(stage));
            }
            let mut ids = states
                .into_iter()
                .map(|x| lookup(&grid, "stage domain state", x))
                .collect::<Result<Vec<_>>>()?;
            ids.sort();
            ids.dedup();
            if stage == 0 && ids != [initial] {
                return Err(ConfigError::InvalidInitialDomain {
                    initial: initial_value,
                });
            }
            domains[stage] = Some(ids);
        }
        let domains = domains
            .into_iter()
            .map(|d| d.unwrap_or_else(|| grid.ids().collect()))
            .collect();

        Ok(ControlProblem {
            grid,
            horizon,
            initial,
            target,
            controls,
            domains,
            brackets,
            terminal_rule: self.terminal_rule,
        })
    }
}

fn lookup(grid: &StateGrid, role: &'static str, value: f64) -> Result<StateId> {
    grid.find(value)
        .ok_or(ConfigError::InadmissibleState { role, value })
}

/// For each interpolated state, find the closest primary states on either side.
fn bracket_interpolated(
    grid: &StateGrid,
    interpolated: &[f64],
) -> Result<Vec<Option<(StateId, StateId)>>> {
    let mut flagged = vec![false; grid.len()];
    for &x in interpolated {
        flagged[lookup(grid, "interpolated state", x)?.0] = true;
    }

    let mut brackets = vec![None; grid.len()];
    for id in grid.ids().filter(|id| flagged[id.0]) {
        let x = grid.value(id);
        let mut below: Option<StateId> = None;
        let mut above: Option<StateId> = None;
        for p in grid.ids().filter(|p| !flagged[p.0]) {
            let v = grid.value(p);
            if v < x && below.map_or(true, |b| v > grid.value(b)) {
                below = Some(p);
            }
            if v > x && above.map_or(true, |a| v < grid.value(a)) {
                above = Some(p);
            }
        }
        match (below, above) {
            (Some(a), Some(b)) => brackets[id.0] = Some((a, b)),
            _ => return Err(ConfigError::UnboundedInterpolation(x)),
        }
    }
    Ok(brackets)
}
