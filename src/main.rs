//! # Manifest Pipeline CLI
//!
//! Binary entry point for the `manifest-pipeline` command-line tool. It
//! parses arguments with `clap`, sets up logging and hands off to the
//! command implementations in `commands/`. All of the actual work happens in
//! the `manifest_pipeline` library crate.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
