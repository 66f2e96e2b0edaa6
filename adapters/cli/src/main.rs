#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that replays gridwalk scenarios headlessly.

mod logging;
mod report;
mod scenario;

use std::{
    io::{self, BufWriter, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use gridwalk_system_motion::Walker;
use gridwalk_system_projection::project;
use log::{debug, info};

use crate::{
    report::{FrameReport, Format},
    scenario::Scenario,
};

/// Headless driver for the gridwalk motion engine.
#[derive(Debug, Parser)]
#[command(name = "gridwalk", author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Mode,
}

#[derive(Debug, Subcommand)]
enum Mode {
    /// Simulate the scenario frame by frame and print the agent state
    Run(ScenarioArgs),
    /// Print the path projected from the scenario's spawn point
    Project(ScenarioArgs),
}

#[derive(Debug, Args)]
struct ScenarioArgs {
    /// Scenario file in TOML format
    scenario: PathBuf,

    /// Emit JSON instead of text
    #[arg(long)]
    json: bool,
}

impl ScenarioArgs {
    fn format(&self) -> Format {
        if self.json {
            Format::Json
        } else {
            Format::Text
        }
    }
}

/// Entry point for the gridwalk command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    match cli.command {
        Mode::Run(args) => run(&args, &mut out)?,
        Mode::Project(args) => project_path(&args, &mut out)?,
    }
    out.flush().context("failed to flush output")
}

fn run(args: &ScenarioArgs, out: &mut impl Write) -> Result<()> {
    let scenario = Scenario::load(&args.scenario)?;
    info!(
        "running {} with spawn {:?}",
        args.scenario.display(),
        scenario.spawn
    );

    let mut walker = Walker::new(scenario.spawn, scenario.config);
    let mut time = 0.0;
    let mut frames = 0;
    for (frame, velocity) in scenario.frame_velocities().enumerate() {
        let state = walker.step(velocity, &scenario.world, scenario.frame_seconds);
        time += scenario.frame_seconds;
        debug!(
            "frame {frame}: {} segments, {:?}",
            walker.path().len(),
            walker.path().termination()
        );
        report::write_frame(out, args.format(), &FrameReport::new(frame, time, state))?;
        frames = frame + 1;
    }

    info!("simulated {frames} frames, final state {:?}", walker.state());
    Ok(())
}

fn project_path(args: &ScenarioArgs, out: &mut impl Write) -> Result<()> {
    let scenario = Scenario::load(&args.scenario)?;
    let velocity = scenario.initial_velocity();
    let path = project(
        scenario.spawn.position,
        velocity,
        &scenario.world,
        &scenario.config,
    );
    info!(
        "projected {} segments from {:?} at velocity {velocity:?}",
        path.len(),
        scenario.spawn.position
    );
    report::write_path(out, args.format(), &path)
}
