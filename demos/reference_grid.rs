//! Example: the six-state reference instance.
//!
//! Run with:
//! `cargo run --example reference_grid`

use dp_control::{config::ProblemConfig, path_cost, report::TextReport, ValueEngine};

fn main() {
    let config = match ProblemConfig::from_toml_str(include_str!("reference.toml")) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("reference_grid: {err}");
            std::process::exit(2);
        }
    };
    let problem = match config.into_problem() {
        Ok(problem) => problem,
        Err(err) => {
            eprintln!("reference_grid: {err}");
            std::process::exit(2);
        }
    };

    let engine = ValueEngine::new(problem);
    let solution = engine.run();

    print!("{}", TextReport::new(&solution));

    // Interpolated cost-to-go is an estimate; the controls actually applied
    // along the path cost a little less.
    println!(
        "Realized stage costs along the path: {:.4}",
        path_cost(engine.model(), solution.path())
    );
    println!("Evaluated transitions:");
    for t in solution.transitions() {
        println!(
            "  k = {}: {} --({:+})--> {}  cost {:.2}",
            t.stage, t.from, t.control, t.to, t.stage_cost
        );
    }
}
