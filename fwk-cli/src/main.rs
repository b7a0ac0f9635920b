//! FWK CLI - headless runner for the flood-warning kiosk simulation.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "fwk-cli",
    version,
    about = "Flood-warning kiosk simulation toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: fwk_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    fwk_cmd::run(cli.command).await
}
