//! CLI argument definitions for the svcgen command-line interface.
//!
//! All `#[derive(Parser)]` and `#[derive(Subcommand)]` types are defined here,
//! keeping `main.rs` focused on dispatch logic.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use svcgen_cli::input::ModuleInput;

/// svcgen - Service descriptor generation for JVM plugin modules
#[derive(Parser)]
#[command(name = "svcgen")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Where the module's classes and classpath come from.
#[derive(Args, Debug, Clone)]
pub(crate) struct ModuleArgs {
    /// The module's compiled-classes directory
    #[arg(short, long)]
    pub classes_dir: String,

    /// JSON manifest of the module's resolved dependencies
    #[arg(short = 'm', long)]
    pub classpath_manifest: Option<String>,

    /// Dependency jar or directory, appended to the classpath (repeatable)
    #[arg(short, long = "dependency")]
    pub dependencies: Vec<String>,

    /// Extension contract to detect, as a dotted binary name such as
    /// com.example.Plugin (repeatable; the first is primary). Unicode
    /// identifiers are accepted. Defaults to the Presto plugin contracts
    #[arg(long = "contract")]
    pub contracts: Vec<String>,
}

impl From<ModuleArgs> for ModuleInput {
    fn from(args: ModuleArgs) -> Self {
        ModuleInput {
            classes_dir: PathBuf::from(args.classes_dir),
            manifest: args.classpath_manifest.map(PathBuf::from),
            dependencies: args.dependencies.into_iter().map(PathBuf::from).collect(),
            contracts: args.contracts,
        }
    }
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Write the service descriptor for the module's plugin implementation
    Generate {
        #[command(flatten)]
        module: ModuleArgs,

        /// Primary descriptor path (default: <classes-dir>/META-INF/services/<primary contract>)
        #[arg(long)]
        descriptor: Option<String>,

        /// Skip descriptor generation
        #[arg(long)]
        skip: bool,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// List the implementations of every contract without writing anything
    Scan {
        #[command(flatten)]
        module: ModuleArgs,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },
}
