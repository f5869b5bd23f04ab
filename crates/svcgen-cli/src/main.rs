//! svcgen CLI - Service descriptor generation for JVM plugin modules
//!
//! This binary is invoked by a build after compilation to detect the
//! module's plugin implementation and write its `META-INF/services` entry.

use clap::Parser;
use std::process::ExitCode;

use svcgen_cli::commands;

mod cli_args;

use cli_args::{Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            module,
            descriptor,
            skip,
            json,
        } => commands::generate::run(&module.into(), descriptor.as_deref(), skip, json),
        Commands::Scan { module, json } => commands::scan::run(&module.into(), json),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
