//! Fleet Degradation Simulation
//!
//! Generates synthetic machine sensor data with degradation-driven failures
//! for testing and for training the failure classifier offline:
//! - Per-machine baselines, slow wear drift, Gaussian noise
//! - Sequential health-score recurrence with threshold stress
//! - Discrete failure events at the first critical-health crossing
//!
//! # Usage
//! ```bash
//! ./simulation --machines 50 --days 60 --seed 42 --output synthetic_sensor_data.csv
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::collections::BTreeMap;
use std::path::PathBuf;

use fleetsense::simulator::{simulate_fleet, SimulatorConfig};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "fleet-simulation")]
#[command(about = "Synthetic degradation data generator for Fleetsense")]
#[command(version = "1.0")]
struct Args {
    /// Number of machines in the fleet (1-10000)
    #[arg(short, long, default_value = "50", value_parser = clap::value_parser!(u32).range(1..=10_000))]
    machines: u32,

    /// Simulated duration in days (1-3650)
    #[arg(short, long, default_value = "60", value_parser = clap::value_parser!(u32).range(1..=3650))]
    days: u32,

    /// Time resolution in minutes (1-1440)
    #[arg(short, long, default_value = "10", value_parser = clap::value_parser!(u32).range(1..=1440))]
    freq_minutes: u32,

    /// Random seed for reproducibility
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Output CSV path
    #[arg(short, long, default_value = "synthetic_sensor_data.csv")]
    output: PathBuf,

    /// Suppress the mission log (only errors reach stderr)
    #[arg(short, long)]
    quiet: bool,
}

// ============================================================================
// Logging Utilities
// ============================================================================

fn log_mission(message: &str, quiet: bool) {
    if !quiet {
        eprintln!("{message}");
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> Result<()> {
    let args = Args::parse();

    let config = SimulatorConfig {
        machines: args.machines,
        days: args.days,
        freq_minutes: args.freq_minutes,
        seed: args.seed,
        ..SimulatorConfig::default()
    };

    // Mission briefing
    log_mission(&"=".repeat(70), args.quiet);
    log_mission("FLEET DEGRADATION SIMULATION v1.0", args.quiet);
    log_mission("Fleetsense Synthetic Sensor Data Generator", args.quiet);
    log_mission(&"=".repeat(70), args.quiet);
    log_mission("", args.quiet);
    log_mission("SIMULATION PARAMETERS:", args.quiet);
    log_mission(&format!("  Machines: {}", config.machines), args.quiet);
    log_mission(
        &format!(
            "  Duration: {} days at {} min resolution ({} steps per machine)",
            config.days,
            config.freq_minutes,
            config.n_steps()
        ),
        args.quiet,
    );
    log_mission(&format!("  Start: {}", config.start), args.quiet);
    log_mission(&format!("  Random seed: {}", config.seed), args.quiet);
    log_mission(&"=".repeat(70), args.quiet);
    log_mission("SIMULATION START", args.quiet);

    let started = std::time::Instant::now();
    let rows = simulate_fleet(&config);

    // Failure statistics (event level)
    let total_failures: u64 = rows.iter().map(|r| u64::from(r.failed)).sum();
    let mut failures_per_machine: BTreeMap<u32, u64> = BTreeMap::new();
    for row in &rows {
        if row.failed == 1 {
            *failures_per_machine.entry(row.machine_id).or_insert(0) += 1;
        }
    }

    fleetsense::simulator::write_csv(&rows, &args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    // Mission debrief
    log_mission(&"=".repeat(70), args.quiet);
    log_mission("SIMULATION COMPLETE", args.quiet);
    log_mission(&"=".repeat(70), args.quiet);
    log_mission(&format!("Total rows: {}", rows.len()), args.quiet);
    log_mission(&format!("Failure events: {total_failures}"), args.quiet);
    log_mission(
        &format!(
            "Machines with a failure event: {} / {}",
            failures_per_machine.len(),
            config.machines
        ),
        args.quiet,
    );
    for (machine_id, count) in &failures_per_machine {
        log_mission(&format!("  machine {machine_id:>4}: {count}"), args.quiet);
    }
    log_mission(
        &format!("Elapsed: {:.1}s", started.elapsed().as_secs_f64()),
        args.quiet,
    );
    log_mission(&format!("Saved to: {}", args.output.display()), args.quiet);
    log_mission(&"=".repeat(70), args.quiet);

    Ok(())
}
