//! Headless runner: `rochambeau_headless [config.toml]`.
//!
//! Logs go to stderr. Set `RUST_LOG` to change the filter (default `info`).

use std::process::ExitCode;

use rochambeau::{Driver, SimConfig, SimResult, Simulation};
use tracing::{error, info};

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn run() -> SimResult<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => {
            info!(%path, "loading config");
            SimConfig::load(path)?
        }
        None => SimConfig::default(),
    };

    let mut sim = Simulation::new(&config)?;
    let (mut driver, _controls) = Driver::new(config.schedule);
    let summary = driver.run(&mut sim)?;

    println!(
        "{:?} after {} ticks ({} ms simulated): {}",
        summary.final_state,
        summary.ticks,
        summary.sim_time.as_millis(),
        summary.counts
    );
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "simulation failed");
            ExitCode::FAILURE
        }
    }
}
