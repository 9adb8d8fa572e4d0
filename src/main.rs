mod cli;
mod commands;
mod config;
mod paths;
mod resource;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use std::io;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    match cli.command {
        Command::Status => commands::status::run(cli.config.as_deref()),
        Command::Plan => commands::plan::run(cli.config.as_deref()),
        Command::Apply(args) => commands::apply::run(cli.config.as_deref(), args.yes),
        Command::Completions { shell } => {
            generate(shell, &mut Cli::command(), "keywarden", &mut io::stdout());
            Ok(())
        }
    }
}
