use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod batch;
mod catalog;
mod classify;
mod cli;
mod config;
mod enrich;
mod extract;
mod marvel;
mod workflow;

use cli::{Command, RootArgs};

fn main() -> Result<()> {
    let args = RootArgs::parse();
    init_tracing(args.verbose);

    match args.command {
        Command::Enrich(args) => workflow::run_enrich(args),
        Command::Classify(args) => workflow::run_classify(args),
        Command::Search(args) => workflow::run_search(args),
        Command::Series(args) => workflow::run_series(args),
        Command::Comic(args) => workflow::run_comic(args),
    }
}

/// Log to stderr so stdout stays clean for summaries and JSON.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
