//! Command implementations for the FWK CLI.
//!
//! Provides headless runs of the kiosk simulation: the scripted demo cycle
//! and constant-rain scenarios, with optional per-tick CSV trace export.

use clap::Subcommand;

pub mod demo;
pub mod simulate;
pub mod trace;

#[derive(Subcommand)]
pub enum Command {
    /// Run the scripted demo cycle headlessly until it returns to idle
    RunDemo {
        /// Jitter seed (runs are reproducible per seed)
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Pace the run in wall-clock time instead of running flat out
        #[arg(long)]
        realtime: bool,

        /// Output path for a per-tick CSV trace
        #[arg(short = 't', long)]
        trace_csv: Option<String>,

        /// Abort if the cycle has not completed after this many ticks
        #[arg(long, default_value_t = 4000)]
        max_ticks: u64,
    },

    /// Hold rain at a constant level for a fixed number of ticks
    Simulate {
        /// Rain intensity, 0-100
        #[arg(short, long)]
        rain: f64,

        /// Number of simulation ticks to run
        #[arg(long, default_value_t = 200)]
        ticks: u64,

        /// Jitter seed (runs are reproducible per seed)
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Output path for a per-tick CSV trace
        #[arg(short = 't', long)]
        trace_csv: Option<String>,
    },
}

pub async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::RunDemo {
            seed,
            realtime,
            trace_csv,
            max_ticks,
        } => demo::run_demo(seed, realtime, trace_csv.as_deref(), max_ticks).await,
        Command::Simulate {
            rain,
            ticks,
            seed,
            trace_csv,
        } => simulate::run_simulate(rain, ticks, seed, trace_csv.as_deref()),
    }
}
