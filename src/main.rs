mod demo;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use stateholder::{logging, Config};

/// Load a user profile through a state holder and print every state change.
#[derive(Debug, Parser)]
#[command(name = "stateholder-demo", version)]
struct Cli {
    /// Config file (defaults to the platform config directory).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Id of the user to load.
    #[arg(long, default_value = "1")]
    user: String,

    /// Simulate an unavailable user service.
    #[arg(long)]
    fail: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    logging::init(&config.logging);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.runtime.worker_threads)
        .enable_all()
        .build()
        .context("building tokio runtime")?;

    runtime.block_on(demo::run(&config, cli.user, cli.fail))
}
