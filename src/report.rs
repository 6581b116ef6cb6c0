//! Console and JSON reporting of a [`Solution`].
//!
//! The text report prints the optimal path, the cost from `x0`, and the full
//! value table stage by stage with states in ascending numeric order.

use crate::engine::{Solution, Transition};
use crate::reconstruct::OptimalPath;
use crate::utils::fmt_state;
use serde::Serialize;
use std::fmt;

const RULE: &str = "----------------------------------------------------------";

/// Text rendering of a solution; use via `Display`.
pub struct TextReport<'a> {
    solution: &'a Solution,
}

impl<'a> TextReport<'a> {
    pub fn new(solution: &'a Solution) -> Self {
        Self { solution }
    }
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let solution = self.solution;
        let problem = solution.problem();
        let grid = problem.grid();
        let x0 = grid.value(problem.initial_state());

        writeln!(f)?;
        writeln!(f, "Optimal path: {}", solution.path().render())?;
        writeln!(
            f,
            "Minimum cost-to-go from initial state x_0 = {}: {:.2}",
            fmt_state(x0),
            solution.cost()
        )?;
        writeln!(f)?;
        writeln!(f, "{RULE}")?;
        for row in solution.table().iter() {
            writeln!(f, "Time step {}:", row.stage())?;
            for id in grid.ascending(row.iter().map(|(id, _)| id)) {
                writeln!(
                    f,
                    "  State {}: Cost-to-go = {:.2}",
                    fmt_state(grid.value(id)),
                    row.cost_to_go(id)
                )?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Serializable view of a solution. Infinite cost-to-go values become `null`.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub horizon: usize,
    pub initial_state: f64,
    pub target_state: f64,
    pub cost: Option<f64>,
    pub path: &'a OptimalPath,
    pub stages: Vec<JsonStage>,
    pub transitions: &'a [Transition],
}

#[derive(Debug, Serialize)]
pub struct JsonStage {
    pub stage: usize,
    pub values: Vec<JsonEntry>,
}

#[derive(Debug, Serialize)]
pub struct JsonEntry {
    pub state: f64,
    pub cost_to_go: Option<f64>,
}

impl<'a> JsonReport<'a> {
    pub fn new(solution: &'a Solution) -> Self {
        let problem = solution.problem();
        let grid = problem.grid();
        let stages = solution
            .table()
            .iter()
            .map(|row| JsonStage {
                stage: row.stage(),
                values: grid
                    .ascending(row.iter().map(|(id, _)| id))
                    .into_iter()
                    .map(|id| JsonEntry {
                        state: grid.value(id),
                        cost_to_go: finite(row.cost_to_go(id)),
                    })
                    .collect(),
            })
            .collect();
        Self {
            horizon: problem.horizon(),
            initial_state: grid.value(problem.initial_state()),
            target_state: grid.value(problem.target_state()),
            cost: finite(solution.cost()),
            path: solution.path(),
            stages,
            transitions: solution.transitions(),
        }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}
