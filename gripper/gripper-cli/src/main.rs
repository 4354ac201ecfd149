//! Gripper synthesis from the command line.
//!
//! # Commands
//!
//! - `gripper-cli synthesize <record.json> --out <problem.tpd>` - Initialize
//!   fingers and trajectory, then write the topology optimization problem
//! - `gripper-cli distance-field <record.json>` - Report on the voxel
//!   distance field around the object
//!
//! Logging goes to stderr. `RUST_LOG` overrides the level; `-v` raises the
//! default from `info` to `debug`.

mod record;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gripper::voxel::{FORBIDDEN, ForbiddenRegions, Occupancy};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::record::DesignRecord;

/// Passive gripper synthesis
#[derive(Parser)]
#[command(name = "gripper-cli")]
#[command(about = "Synthesize passive grippers from design records", long_about = None)]
#[command(version)]
struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pipeline and write the topology optimization problem
    Synthesize {
        /// JSON design record
        #[arg(name = "RECORD")]
        record: PathBuf,

        /// Output problem definition file; its stem names the problem
        #[arg(long, short)]
        out: PathBuf,
    },

    /// Build the distance field and print a summary
    DistanceField {
        /// JSON design record
        #[arg(name = "RECORD")]
        record: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Synthesize { record, out } => synthesize(&record, &out),
        Commands::DistanceField { record } => distance_field(&record),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn synthesize(record_path: &Path, out: &Path) -> Result<()> {
    let record = DesignRecord::load(record_path)?;
    let mut session = record.session()?;

    let finger_count = session.fingers().context("Finger initialization failed")?.len();
    let keyframe_count = session
        .trajectory()
        .context("Trajectory initialization failed")?
        .len();
    info!(
        fingers = finger_count,
        keyframes = keyframe_count,
        "pipeline complete"
    );

    let config = session
        .export_topology_config(out, record.negative_space.as_ref())
        .with_context(|| format!("Failed to export {}", out.display()))?;

    println!("Wrote {}", out.display());
    println!("  fingers:   {finger_count}");
    println!("  keyframes: {keyframe_count}");
    for axis in ["X", "Y", "Z"] {
        let key = format!("NUM_ELEM_{axis}");
        println!("  {key}: {}", config.get(&key).unwrap_or("?"));
    }
    Ok(())
}

fn distance_field(record_path: &Path) -> Result<()> {
    let record = DesignRecord::load(record_path)?;
    let mut session = record.session()?;
    let field = session
        .distance_field()
        .context("Distance field construction failed")?;

    let grid = field.grid();
    let mut occupancy = Occupancy::empty(grid.clone());
    for coord in grid.voxels() {
        if field.distance_at(coord) == Some(FORBIDDEN) {
            occupancy.set_forbidden(coord, true);
        }
    }
    let regions = ForbiddenRegions::label(&occupancy);

    let [x, y, z] = grid.size();
    println!("Grid:      {x} x {y} x {z} (resolution {:.6})", grid.resolution());
    println!("Seed:      {:?}", field.seed().as_array());
    println!("Reached:   {} of {}", field.reached_count(), grid.voxel_count());
    println!("Forbidden: {}", occupancy.forbidden_count());
    println!("Regions:   {}", regions.region_count());
    if let Some(max) = field.max_distance() {
        println!("Max hops:  {max}");
    }
    Ok(())
}
