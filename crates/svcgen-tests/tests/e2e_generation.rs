//! End-to-End Generation Tests for svcgen
//!
//! Tests verify:
//! - Each contract kind writes its descriptor at the right path
//! - Implementations are found through superclasses and jar-provided
//!   interfaces
//! - Symbolic links in the compiled-classes directory are followed
//! - Skip conditions leave the module untouched
//! - The CLI front end drives the same generation from a classpath manifest
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p svcgen-tests --test e2e_generation
//! ```

use pretty_assertions::assert_eq;
use std::fs;
use std::process::ExitCode;
use svcgen_cli::input::ModuleInput;
use svcgen_core::testing::ClassBytes;
use svcgen_core::{
    Dependency, DependencyScope, GenerationOutcome, GeneratorConfig, WriteOutcome,
    COORDINATOR_PLUGIN, PLUGIN, ROUTER_PLUGIN, SKIP_MESSAGE,
};
use svcgen_tests::fixtures::PluginModuleFixture;
use svcgen_tests::harness::run_generate;

// ============================================================================
// Contract Kinds
// ============================================================================

/// A single Plugin implementation lands at the primary descriptor path and
/// nothing else is written.
#[test]
fn test_plugin_descriptor() {
    let module = PluginModuleFixture::with_presto_spi();
    module.add_class(ClassBytes::class("its.BasicPlugin").implements(PLUGIN));
    module.add_class(ClassBytes::class("its.Helper"));

    let run = run_generate(&module.config());
    run.assert_success();

    assert_eq!(
        module.read_descriptor(PLUGIN).as_deref(),
        Some("its.BasicPlugin")
    );
    assert_eq!(module.descriptor_files(), vec![PLUGIN.to_string()]);
    assert_eq!(
        run.log,
        vec![format!("Wrote META-INF/services/{} with its.BasicPlugin", PLUGIN)]
    );
}

/// A CoordinatorPlugin implementation gets a sibling descriptor named after
/// its contract.
#[test]
fn test_coordinator_plugin_descriptor() {
    let module = PluginModuleFixture::with_presto_spi();
    module.add_class(
        ClassBytes::class("its.BasicCoordinatorPlugin").implements(COORDINATOR_PLUGIN),
    );

    run_generate(&module.config()).assert_success();

    assert_eq!(
        module.read_descriptor(COORDINATOR_PLUGIN).as_deref(),
        Some("its.BasicCoordinatorPlugin")
    );
    assert_eq!(module.descriptor_files(), vec![COORDINATOR_PLUGIN.to_string()]);
}

/// A RouterPlugin implementation gets a sibling descriptor named after its
/// contract.
#[test]
fn test_router_plugin_descriptor() {
    let module = PluginModuleFixture::with_presto_spi();
    module.add_class(ClassBytes::class("its.BasicRouterPlugin").implements(ROUTER_PLUGIN));

    let run = run_generate(&module.config());

    match run.assert_success() {
        GenerationOutcome::Generated { descriptor } => {
            assert_eq!(descriptor.selection.contract.name(), ROUTER_PLUGIN);
            assert_eq!(descriptor.path, module.descriptor_path(ROUTER_PLUGIN));
            assert_eq!(descriptor.outcome, WriteOutcome::Written);
        }
        other => panic!("expected Generated, got {:?}", other),
    }
    assert_eq!(
        module.read_descriptor(ROUTER_PLUGIN).as_deref(),
        Some("its.BasicRouterPlugin")
    );
}

// ============================================================================
// Type Graph
// ============================================================================

/// A class inheriting the contract from a superclass in a dependency jar is
/// an implementation.
#[test]
fn test_implementation_through_jar_superclass() {
    let mut module = PluginModuleFixture::with_presto_spi();
    module.add_dependency_jar(
        "plugin-toolkit.jar",
        &[ClassBytes::class("toolkit.AbstractPlugin").implements(PLUGIN)],
    );
    module.add_class(ClassBytes::class("its.ToolkitPlugin").extends("toolkit.AbstractPlugin"));

    run_generate(&module.config()).assert_success();

    assert_eq!(
        module.read_descriptor(PLUGIN).as_deref(),
        Some("its.ToolkitPlugin")
    );
}

/// A class implementing an interface that extends the contract is an
/// implementation; the intermediate interface in the jar is not a candidate.
#[test]
fn test_implementation_through_superinterface() {
    let mut module = PluginModuleFixture::with_presto_spi();
    module.add_dependency_jar(
        "routing.jar",
        &[ClassBytes::interface("routing.SmartRouter").implements(ROUTER_PLUGIN)],
    );
    module.add_class(ClassBytes::class("its.Smart").implements("routing.SmartRouter"));

    run_generate(&module.config()).assert_success();

    assert_eq!(
        module.read_descriptor(ROUTER_PLUGIN).as_deref(),
        Some("its.Smart")
    );
}

/// Nested classes are enumerated like any other class file.
#[test]
fn test_nested_class_implementation() {
    let module = PluginModuleFixture::with_presto_spi();
    module.add_class(ClassBytes::class("its.Outer"));
    module.add_class(ClassBytes::class("its.Outer$InnerPlugin").implements(PLUGIN));

    run_generate(&module.config()).assert_success();

    assert_eq!(
        module.read_descriptor(PLUGIN).as_deref(),
        Some("its.Outer$InnerPlugin")
    );
}

/// Dependencies without a resolved file are skipped during classpath
/// assembly.
#[test]
fn test_unresolved_dependency_is_ignored() {
    let mut module = PluginModuleFixture::with_presto_spi();
    module.add_dependency(Dependency::unresolved(
        "com.example:bom:1",
        DependencyScope::Import,
    ));
    module.add_class(ClassBytes::class("its.BasicPlugin").implements(PLUGIN));

    run_generate(&module.config()).assert_success();

    assert!(module.read_descriptor(PLUGIN).is_some());
}

// ============================================================================
// Symbolic Links
// ============================================================================

/// A package directory linked into the compiled-classes directory is
/// scanned.
#[cfg(unix)]
#[test]
fn test_symlinked_package_directory() {
    let module = PluginModuleFixture::with_presto_spi();
    let shared = module.path().join("shared");
    ClassBytes::class("its.BasicPlugin")
        .implements(PLUGIN)
        .write_to(&shared)
        .unwrap();
    std::os::unix::fs::symlink(shared.join("its"), module.classes_dir.join("its")).unwrap();

    run_generate(&module.config()).assert_success();

    assert_eq!(
        module.read_descriptor(PLUGIN).as_deref(),
        Some("its.BasicPlugin")
    );
}

/// A class file linked into the compiled-classes directory is scanned.
#[cfg(unix)]
#[test]
fn test_symlinked_class_file() {
    let module = PluginModuleFixture::with_presto_spi();
    let shared = module.path().join("shared");
    ClassBytes::class("its.BasicRouterPlugin")
        .implements(ROUTER_PLUGIN)
        .write_to(&shared)
        .unwrap();
    fs::create_dir_all(module.classes_dir.join("its")).unwrap();
    std::os::unix::fs::symlink(
        shared.join("its/BasicRouterPlugin.class"),
        module.classes_dir.join("its/BasicRouterPlugin.class"),
    )
    .unwrap();

    run_generate(&module.config()).assert_success();

    assert_eq!(
        module.read_descriptor(ROUTER_PLUGIN).as_deref(),
        Some("its.BasicRouterPlugin")
    );
}

// ============================================================================
// Skip Conditions
// ============================================================================

/// The skip flag logs one line and writes nothing, even for a module that
/// would otherwise fail.
#[test]
fn test_skip_flag() {
    let module = PluginModuleFixture::new();
    let config = GeneratorConfig {
        skip: true,
        ..module.config()
    };

    let run = run_generate(&config);

    assert_eq!(run.assert_success(), &GenerationOutcome::Disabled);
    assert_eq!(run.log, vec![SKIP_MESSAGE.to_string()]);
    assert!(module.descriptor_files().is_empty());
}

/// An existing primary descriptor short-circuits before any scanning, so an
/// unresolvable module still succeeds.
#[test]
fn test_existing_primary_descriptor() {
    let module = PluginModuleFixture::new();
    module.add_class(ClassBytes::class("its.Broken").extends("missing.Base"));
    fs::create_dir_all(module.services_dir()).unwrap();
    fs::write(module.descriptor_path(PLUGIN), "user.Chosen").unwrap();

    let run = run_generate(&module.config());

    assert_eq!(
        run.assert_success(),
        &GenerationOutcome::DescriptorPresent {
            path: module.descriptor_path(PLUGIN)
        }
    );
    assert!(run.log.is_empty());
    assert_eq!(module.read_descriptor(PLUGIN).as_deref(), Some("user.Chosen"));
}

/// An existing secondary descriptor is left unchanged and reported as such.
#[test]
fn test_existing_secondary_descriptor() {
    let module = PluginModuleFixture::with_presto_spi();
    module.add_class(ClassBytes::class("its.BasicRouterPlugin").implements(ROUTER_PLUGIN));
    fs::create_dir_all(module.services_dir()).unwrap();
    fs::write(module.descriptor_path(ROUTER_PLUGIN), "user.Router\n").unwrap();

    let run = run_generate(&module.config());

    match run.assert_success() {
        GenerationOutcome::Generated { descriptor } => {
            assert_eq!(descriptor.outcome, WriteOutcome::AlreadyPresent);
        }
        other => panic!("expected Generated, got {:?}", other),
    }
    assert!(run.log.is_empty());
    assert_eq!(
        module.read_descriptor(ROUTER_PLUGIN).as_deref(),
        Some("user.Router\n")
    );
}

/// A dangling link at the descriptor path counts as an existing descriptor
/// and its target is never created.
#[cfg(unix)]
#[test]
fn test_dangling_descriptor_link_is_left_alone() {
    let module = PluginModuleFixture::with_presto_spi();
    module.add_class(ClassBytes::class("its.BasicPlugin").implements(PLUGIN));
    let target = module.path().join("outside/target");
    fs::create_dir_all(module.services_dir()).unwrap();
    std::os::unix::fs::symlink(&target, module.descriptor_path(PLUGIN)).unwrap();

    let run = run_generate(&module.config());

    match run.assert_success() {
        GenerationOutcome::Generated { descriptor } => {
            assert_eq!(descriptor.outcome, WriteOutcome::AlreadyPresent);
        }
        other => panic!("expected Generated, got {:?}", other),
    }
    assert!(run.log.is_empty());
    assert!(!module.path().join("outside").exists());
}

/// A custom primary descriptor path moves secondaries along with it.
#[test]
fn test_custom_descriptor_path_moves_secondaries() {
    let module = PluginModuleFixture::with_presto_spi();
    module.add_class(ClassBytes::class("its.BasicRouterPlugin").implements(ROUTER_PLUGIN));
    let custom = module.path().join("out/services/plugin");
    let config = GeneratorConfig {
        descriptor_path: Some(custom.clone()),
        ..module.config()
    };

    run_generate(&config).assert_success();

    let sibling = module.path().join("out/services").join(ROUTER_PLUGIN);
    assert_eq!(
        fs::read_to_string(sibling).unwrap(),
        "its.BasicRouterPlugin"
    );
    assert!(!custom.exists());
}

// ============================================================================
// CLI Front End
// ============================================================================

/// The generate command reads dependencies from a classpath manifest and
/// writes the same descriptor as the library.
#[test]
fn test_cli_generate_with_manifest() {
    let mut module = PluginModuleFixture::with_presto_spi();
    module.add_dependency(
        Dependency::with_file("junit:junit:4.13", module.repo_dir.join("junit.jar"))
            .scope(DependencyScope::Test),
    );
    module.add_class(ClassBytes::class("its.BasicPlugin").implements(PLUGIN));
    let input = ModuleInput {
        manifest: Some(module.write_manifest()),
        ..ModuleInput::new(&module.classes_dir)
    };

    let code = svcgen_cli::commands::generate::run(&input, None, false, true).unwrap();

    assert_eq!(code, ExitCode::SUCCESS);
    assert_eq!(
        module.read_descriptor(PLUGIN).as_deref(),
        Some("its.BasicPlugin")
    );
}

/// The scan command reports without writing.
#[test]
fn test_cli_scan_writes_nothing() {
    let module = PluginModuleFixture::with_presto_spi();
    module.add_class(ClassBytes::class("its.BasicPlugin").implements(PLUGIN));
    let input = ModuleInput {
        manifest: Some(module.write_manifest()),
        ..ModuleInput::new(&module.classes_dir)
    };

    let code = svcgen_cli::commands::scan::run(&input, false).unwrap();

    assert_eq!(code, ExitCode::SUCCESS);
    assert!(module.descriptor_files().is_empty());
}
