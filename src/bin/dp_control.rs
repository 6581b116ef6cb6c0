use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use dp_control::config::load_problem;
use dp_control::problems::reference;
use dp_control::report::{JsonReport, TextReport};
use dp_control::{path_cost, ControlProblem, ValueEngine};
use tracing_subscriber::EnvFilter;

/// Solve a finite-horizon control problem by backward value iteration.
#[derive(Debug, Parser)]
#[command(name = "dp-control", version, about)]
struct Cli {
    /// Problem definition (TOML). Defaults to the built-in reference instance.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` wins if set.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load(cli: &Cli) -> Result<ControlProblem, String> {
    match &cli.config {
        Some(path) => load_problem(path).map_err(|e| e.to_string()),
        None => reference::reference_problem().map_err(|e| e.to_string()),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let problem = match load(&cli) {
        Ok(problem) => problem,
        Err(err) => {
            eprintln!("dp-control: {err}");
            return ExitCode::from(2);
        }
    };
    tracing::info!(
        horizon = problem.horizon(),
        states = problem.grid().len(),
        "solving"
    );

    let engine = ValueEngine::new(problem);
    let solution = engine.run();
    tracing::debug!(
        realized = path_cost(engine.model(), solution.path()),
        value = solution.cost(),
        "path cost audit"
    );

    match cli.format {
        OutputFormat::Text => print!("{}", TextReport::new(&solution)),
        OutputFormat::Json => match JsonReport::new(&solution).to_json_pretty() {
            Ok(json) => println!("{json}"),
            Err(err) => {
                eprintln!("dp-control output error: {err}");
                return ExitCode::FAILURE;
            }
        },
    }
    ExitCode::SUCCESS
}
