//! Binary crate for the `weatherkit` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments and credential overrides
//! - Interactive configuration
//! - Human-friendly output formatting

use clap::Parser;

mod cli;
mod logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    logging::init_logging(cmd.log_level, cmd.log_format);
    cmd.run().await
}
