//! breakup CLI - NASA Standard Breakup Model simulator.
//!
//! Runs one breakup event described by a YAML configuration file and
//! writes the resulting fragments to the configured targets.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use tracing::{error, info};

use breakup::config::BreakupConfig;
use breakup::error::BreakupResult;
use breakup::input::read_satellites;
use breakup::output::build_output_targets;
use breakup::simulation::builder::BreakupBuilder;

/// Simulates the breakup of one or two in-orbit objects.
#[derive(Debug, Parser)]
#[command(name = "breakup", version, about)]
struct Cli {
    /// Path to the YAML configuration file.
    config: PathBuf,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    match run(&cli.config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(config_path: &Path) -> BreakupResult<()> {
    let config = BreakupConfig::load(config_path)?;
    let satellites = read_satellites(&config.simulation.input_source)?;

    let mut simulation = BreakupBuilder::new(config.minimal_characteristic_length()?)
        .simulation_kind(config.simulation_kind())
        .current_max_id(config.simulation.current_max_id)
        .id_filter(config.id_filter())
        .enforce_mass_conservation(config.simulation.enforce_mass_conservation)
        .satellites(satellites)
        .build()?;

    let start = Instant::now();
    simulation.run();
    info!("the simulation took {} ms", start.elapsed().as_millis());
    info!(
        "the simulation produced {} fragments",
        simulation.result_soa().len()
    );

    if let Some(section) = &config.result_output {
        let result = simulation.result();
        for target in build_output_targets(section)? {
            target.write(&result)?;
            info!("wrote result to {}", target.path().display());
        }
    } else {
        info!("no output target defined for the result of the simulation");
    }

    if let Some(section) = &config.input_output {
        for target in build_output_targets(section)? {
            target.write(simulation.input())?;
            info!("wrote input to {}", target.path().display());
        }
    }

    Ok(())
}
