//! Runs the exact search, the heuristic evaluation and the statistics described by a TOML file.
//!
//! Usage: `swils <config.toml>`. The summary is printed to stdout as tab separated rows, logging
//! goes to stderr and is controlled by `RUST_LOG`. When the configuration names a `permutation`,
//! only that permutation is sorted by the selected heuristics and their inversions are printed.
use std::{io::Write, process::ExitCode};

use swils::{config::RunConfig, pipeline};
use tracing::{error, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

fn execute(config: &RunConfig) -> swils::Result<()> {
    let mut stdout = std::io::stdout().lock();
    match config.parse_permutation()? {
        Some(pi) => {
            let reports = pipeline::inspect(&pi, &config.heuristics)?;
            pipeline::write_inspection(&mut stdout, &reports)?;
        }
        None => {
            for row in pipeline::run(config)? {
                writeln!(stdout, "{row}")?;
            }
        }
    }
    stdout.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let Some(path) = std::env::args_os().nth(1) else {
        eprintln!("usage: swils <config.toml>");
        return ExitCode::FAILURE;
    };

    match RunConfig::load(&path).and_then(|config| execute(&config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(event = "run_failed", error = %err);
            ExitCode::FAILURE
        }
    }
}
