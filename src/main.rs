//! archscope - architecture diagrams from live object graphs

mod demo;
mod demo_cli;
mod snapshot_cli;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "archscope")]
#[command(about = "Scrape component structures and render PlantUML diagrams", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Snapshot(snapshot_cli::SnapshotCommands),
    /// Scrape the bundled demo application
    Demo(demo_cli::DemoArgs),
}

fn main() -> anyhow::Result<()> {
    // stdout carries diagrams and JSON, logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Snapshot(cmd) => snapshot_cli::run(cmd)?,
        Commands::Demo(args) => demo_cli::run(args)?,
    }

    Ok(())
}
