//! svcgen Core Library
//!
//! Discovers which compiled class of a JVM plugin module implements one of
//! a fixed set of extension-point contracts and writes the matching
//! `META-INF/services` descriptor.
//!
//! # Overview
//!
//! A generation run goes through these stages:
//!
//! - **Classpath assembly**: the module's compiled-classes directory, then
//!   every dependency with a resolved file
//! - **Enumeration**: every `.class` file beneath the compiled-classes directory
//! - **Resolution**: class file headers are read from the module's classpath
//!   (never from the generator's own process) to build the supertype graph
//! - **Matching**: per contract, the enumerated classes assignable to it
//! - **Selection**: exactly one implementation of exactly one contract
//! - **Output**: the implementation name is written to the contract's descriptor
//!
//! # Example
//!
//! ```no_run
//! use svcgen_core::{generate, Dependency, GeneratorConfig};
//!
//! let config = GeneratorConfig::builder("target/classes")
//!     .dependency(Dependency::with_file(
//!         "com.facebook.presto:presto-spi:0.290",
//!         "/repo/presto-spi-0.290.jar",
//!     ))
//!     .build();
//!
//! let mut log: Vec<String> = Vec::new();
//! let outcome = generate(&config, &mut log).unwrap();
//! println!("{:?}", outcome);
//! ```
//!
//! # Modules
//!
//! - [`classpath`]: Dependencies, scopes, and classpath assembly
//! - [`classfile`]: Class file header decoding
//! - [`enumerate`]: Compiled class enumeration
//! - [`resolver`]: Isolated type resolution and assignability
//! - [`contract`]: Extension contracts and descriptor paths
//! - [`matcher`]: Per-contract implementation discovery
//! - [`selection`]: Uniqueness policy
//! - [`descriptor`]: Descriptor output
//! - [`generator`]: The generation entry points
//! - [`error`]: Error types

pub mod classfile;
pub mod classpath;
pub mod contract;
pub mod descriptor;
pub mod enumerate;
pub mod error;
pub mod generator;
pub mod log;
pub mod matcher;
pub mod resolver;
pub mod selection;

#[cfg(any(test, feature = "test-fixtures"))]
pub mod testing;

// Re-export commonly used types at the crate root
pub use classfile::ClassHeader;
pub use classpath::{Classpath, ClasspathEntry, Dependency, DependencyScope};
pub use contract::{
    is_valid_type_name, ContractSet, ExtensionContract, COORDINATOR_PLUGIN, PLUGIN, ROUTER_PLUGIN,
    SERVICES_DIR,
};
pub use descriptor::{write_descriptor, WriteOutcome};
pub use enumerate::enumerate_classes;
pub use error::{ClassFormatError, ConfigError, GenerateError, ResolveError};
pub use generator::{
    generate, scan, DescriptorRecord, GenerationOutcome, GeneratorConfig, GeneratorConfigBuilder,
    SKIP_MESSAGE,
};
pub use log::{LogSink, NullLog};
pub use matcher::{find_implementations, match_contracts, ContractMatches, MatchResult};
pub use resolver::{is_platform_type, ResolvedType, TypeOrigin, TypeResolver};
pub use selection::{select, Selection};
