//! svcgen End-to-End Test Infrastructure
//!
//! This crate provides integration tests for descriptor generation:
//!
//! - Generation: compiled module -> service descriptor
//! - Validation: every policy failure and its message
//! - **Determinism**: byte-identical descriptors across runs
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p svcgen-tests
//! ```
//!
//! ## Fixtures
//!
//! Modules are synthesized on disk: class files come from
//! [`svcgen_core::testing::ClassBytes`] and dependency jars are written
//! with the `zip` crate, so no JDK is needed.
//!
//! ```rust,ignore
//! use svcgen_tests::fixtures::PluginModuleFixture;
//! use svcgen_tests::harness::run_generate;
//!
//! let module = PluginModuleFixture::with_presto_spi();
//! module.add_class(ClassBytes::class("its.BasicPlugin").implements(PLUGIN));
//! let run = run_generate(&module.config());
//! run.assert_success();
//! ```

pub mod determinism;
pub mod fixtures;
pub mod harness;

// Re-export commonly used items
pub use determinism::{compute_hash, hash_tree, TreeHashes};
pub use fixtures::PluginModuleFixture;
pub use harness::{run_generate, GenerationRun};
