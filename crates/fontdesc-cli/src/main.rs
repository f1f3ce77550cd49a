// this_file: crates/fontdesc-cli/src/main.rs

//! fontdesc CLI: pack fonts into descriptor streams and inspect them.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match &cli.command {
        Commands::Pack(args) => commands::pack::run(args),
        Commands::Dump(args) => commands::dump::run(args),
        Commands::Info => commands::info::run(),
    }
}

fn init_logger(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}
