//! End-to-End Validation Tests for svcgen
//!
//! Tests verify that every rejected module fails with the right error code
//! and message, and that a failed run writes no descriptor.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p svcgen-tests --test e2e_validation
//! ```

use pretty_assertions::assert_eq;
use std::fs;
use svcgen_core::testing::ClassBytes;
use svcgen_core::{
    ContractSet, GenerateError, GeneratorConfig, ResolveError, COORDINATOR_PLUGIN, PLUGIN,
    ROUTER_PLUGIN,
};
use svcgen_tests::fixtures::PluginModuleFixture;
use svcgen_tests::harness::run_generate;

// ============================================================================
// Selection Policy
// ============================================================================

/// A module with no implementation of any contract is rejected.
#[test]
fn test_no_implementation() {
    let module = PluginModuleFixture::with_presto_spi();
    module.add_class(ClassBytes::class("its.Helper"));

    let run = run_generate(&module.config());

    run.assert_failure("SVC_002");
    assert_eq!(
        run.message(),
        format!(
            "You must have at least one class that implements {}, {}, or {}.",
            PLUGIN, COORDINATOR_PLUGIN, ROUTER_PLUGIN
        )
    );
    assert!(module.descriptor_files().is_empty());
}

/// An empty compiled-classes directory is rejected by the policy, not by the
/// scan.
#[test]
fn test_empty_module() {
    let module = PluginModuleFixture::with_presto_spi();
    fs::remove_dir_all(&module.classes_dir).unwrap();

    run_generate(&module.config()).assert_failure("SVC_002");
}

/// Implementations of two contract kinds are rejected, naming every
/// contract.
#[test]
fn test_multiple_contract_kinds() {
    let module = PluginModuleFixture::with_presto_spi();
    module.add_class(ClassBytes::class("its.X").implements(PLUGIN));
    module.add_class(ClassBytes::class("its.Z").implements(ROUTER_PLUGIN));

    let run = run_generate(&module.config());

    run.assert_failure("SVC_003");
    assert_eq!(
        run.message(),
        format!(
            "You have classes that implement multiple of {}, {}, or {}. \
             You can only have one plugin implementation per project.",
            PLUGIN, COORDINATOR_PLUGIN, ROUTER_PLUGIN
        )
    );
    assert!(module.descriptor_files().is_empty());
}

/// Multiple contract kinds win over ambiguity within one kind.
#[test]
fn test_multiple_kinds_checked_before_ambiguity() {
    let module = PluginModuleFixture::with_presto_spi();
    module.add_class(ClassBytes::class("its.A1").implements(COORDINATOR_PLUGIN));
    module.add_class(ClassBytes::class("its.A2").implements(COORDINATOR_PLUGIN));
    module.add_class(ClassBytes::class("its.B").implements(PLUGIN));

    run_generate(&module.config()).assert_failure("SVC_003");
}

/// A class implementing two contracts counts for both kinds.
#[test]
fn test_one_class_implementing_two_contracts() {
    let module = PluginModuleFixture::with_presto_spi();
    module.add_class(
        ClassBytes::class("its.Both")
            .implements(PLUGIN)
            .implements(ROUTER_PLUGIN),
    );

    run_generate(&module.config()).assert_failure("SVC_003");
}

/// Two implementations of one contract are rejected, listing both in
/// enumeration order.
#[test]
fn test_ambiguous_implementations() {
    let module = PluginModuleFixture::with_presto_spi();
    module.add_class(ClassBytes::class("its.X2").implements(PLUGIN));
    module.add_class(ClassBytes::class("its.X").implements(PLUGIN));

    let run = run_generate(&module.config());

    match run.assert_failure("SVC_004") {
        GenerateError::AmbiguousImplementation {
            contract,
            implementations,
        } => {
            assert_eq!(contract, PLUGIN);
            assert_eq!(implementations, &vec!["its.X", "its.X2"]);
        }
        other => panic!("expected AmbiguousImplementation, got {:?}", other),
    }
    assert_eq!(
        run.message(),
        format!(
            "You have more than one class that implements {}:\n\n\
             its.X\n\
             its.X2\n\
             \n\
             You can only have one per plugin project.",
            PLUGIN
        )
    );
    assert!(module.descriptor_files().is_empty());
}

/// An abstract base and its concrete subclass are both implementations.
#[test]
fn test_base_class_and_subclass_are_ambiguous() {
    let module = PluginModuleFixture::with_presto_spi();
    module.add_class(ClassBytes::class("its.AbstractPlugin").implements(PLUGIN));
    module.add_class(ClassBytes::class("its.ConcretePlugin").extends("its.AbstractPlugin"));

    let run = run_generate(&module.config());

    match run.assert_failure("SVC_004") {
        GenerateError::AmbiguousImplementation {
            implementations, ..
        } => {
            assert_eq!(
                implementations,
                &vec!["its.AbstractPlugin", "its.ConcretePlugin"]
            );
        }
        other => panic!("expected AmbiguousImplementation, got {:?}", other),
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Without the SPI on the classpath the contracts cannot be resolved.
#[test]
fn test_missing_contract() {
    let module = PluginModuleFixture::new();
    module.add_class(ClassBytes::class("its.BasicPlugin").implements(PLUGIN));

    let run = run_generate(&module.config());

    match run.assert_failure("SVC_001") {
        GenerateError::Resolution { source, .. } => {
            assert_eq!(source.type_name(), Some(PLUGIN));
        }
        other => panic!("expected Resolution, got {:?}", other),
    }
    assert!(run.message().starts_with(&format!(
        "Error scanning for classes implementing {}, {}, and {}",
        PLUGIN, COORDINATOR_PLUGIN, ROUTER_PLUGIN
    )));
    assert!(module.descriptor_files().is_empty());
}

/// A candidate whose superclass is missing from the classpath aborts the
/// run, naming the missing type.
#[test]
fn test_missing_supertype() {
    let module = PluginModuleFixture::with_presto_spi();
    module.add_class(ClassBytes::class("its.BasicPlugin").implements(PLUGIN));
    module.add_class(ClassBytes::class("its.Orphan").extends("com.example.Gone"));

    let run = run_generate(&module.config());

    match run.assert_failure("SVC_001") {
        GenerateError::Resolution { source, .. } => match source {
            ResolveError::NotFound { name } => assert_eq!(name, "com.example.Gone"),
            other => panic!("expected NotFound, got {:?}", other),
        },
        other => panic!("expected Resolution, got {:?}", other),
    }
    assert!(run.message().contains("com.example.Gone"));
    assert!(module.descriptor_files().is_empty());
}

/// A compiled class that is not a valid class file aborts the run.
#[test]
fn test_malformed_class_file() {
    let module = PluginModuleFixture::with_presto_spi();
    module.add_class(ClassBytes::class("its.BasicPlugin").implements(PLUGIN));
    fs::write(module.classes_dir.join("its/Garbage.class"), b"not a class").unwrap();

    let run = run_generate(&module.config());

    match run.assert_failure("SVC_001") {
        GenerateError::Resolution { source, .. } => {
            assert!(matches!(source, ResolveError::Malformed { .. }));
            assert_eq!(source.type_name(), Some("its.Garbage"));
        }
        other => panic!("expected Resolution, got {:?}", other),
    }
}

/// A class file stored under the wrong path is rejected.
#[test]
fn test_misplaced_class_file() {
    let module = PluginModuleFixture::with_presto_spi();
    let bytes = ClassBytes::class("its.Real").implements(PLUGIN).build();
    fs::create_dir_all(module.classes_dir.join("other")).unwrap();
    fs::write(module.classes_dir.join("other/Fake.class"), bytes).unwrap();

    let run = run_generate(&module.config());

    match run.assert_failure("SVC_001") {
        GenerateError::Resolution { source, .. } => {
            assert!(matches!(source, ResolveError::NameMismatch { .. }));
        }
        other => panic!("expected Resolution, got {:?}", other),
    }
}

/// A corrupt dependency jar aborts the run.
#[test]
fn test_corrupt_dependency_jar() {
    let mut module = PluginModuleFixture::new();
    let jar = module.repo_dir.join("corrupt.jar");
    fs::write(&jar, b"PK but not really").unwrap();
    module.add_dependency(svcgen_core::Dependency::with_file("g:corrupt:1", &jar));
    module.add_class(ClassBytes::class("its.BasicPlugin").implements(PLUGIN));

    let run = run_generate(&module.config());

    match run.assert_failure("SVC_001") {
        GenerateError::Resolution { source, .. } => {
            assert!(matches!(source, ResolveError::Archive { .. }));
        }
        other => panic!("expected Resolution, got {:?}", other),
    }
}

// ============================================================================
// Output
// ============================================================================

/// A file where the services directory should be fails directory creation.
#[test]
fn test_services_directory_blocked() {
    let module = PluginModuleFixture::with_presto_spi();
    module.add_class(ClassBytes::class("its.BasicPlugin").implements(PLUGIN));
    fs::write(module.classes_dir.join("META-INF"), b"in the way").unwrap();

    let run = run_generate(&module.config());

    run.assert_failure("SVC_005");
    assert!(run
        .message()
        .starts_with("Failed to create directory: "));
    assert!(run.log.is_empty());
}

/// A descriptor path the filesystem cannot create fails the write.
#[test]
fn test_descriptor_write_failure() {
    let module = PluginModuleFixture::with_presto_spi();
    module.add_class(ClassBytes::class("its.BasicPlugin").implements(PLUGIN));
    let unwritable = module.path().join("out").join("p".repeat(300));
    let config = GeneratorConfig {
        descriptor_path: Some(unwritable.clone()),
        ..module.config()
    };

    let run = run_generate(&config);

    match run.assert_failure("SVC_006") {
        GenerateError::DescriptorWrite { path, .. } => assert_eq!(path, &unwritable),
        other => panic!("expected DescriptorWrite, got {:?}", other),
    }
    assert_eq!(
        run.message(),
        format!("Failed to write service descriptor {}.", unwritable.display())
    );
    assert!(run.log.is_empty());
}

/// A link cycle under the compiled-classes directory fails the scan.
#[cfg(unix)]
#[test]
fn test_symlink_cycle_fails_scan() {
    let module = PluginModuleFixture::with_presto_spi();
    module.add_class(ClassBytes::class("its.BasicPlugin").implements(PLUGIN));
    std::os::unix::fs::symlink(&module.classes_dir, module.classes_dir.join("its/cycle")).unwrap();

    let run = run_generate(&module.config());

    match run.assert_failure("SVC_007") {
        GenerateError::Scan { path, .. } => assert_eq!(path, &module.classes_dir),
        other => panic!("expected Scan, got {:?}", other),
    }
    assert!(run.message().starts_with(&format!(
        "Failed to scan compiled classes in {}: ",
        module.classes_dir.display()
    )));
    assert!(module.descriptor_files().is_empty());
}

// ============================================================================
// Configuration
// ============================================================================

/// A custom single-contract set detects only that contract.
#[test]
fn test_custom_contract_set() {
    let mut module = PluginModuleFixture::new();
    module.add_dependency_jar(
        "extension-api.jar",
        &[ClassBytes::interface("com.example.Extension")],
    );
    module.add_class(ClassBytes::class("its.Ext").implements("com.example.Extension"));
    module.add_class(ClassBytes::class("its.NotChecked").implements(PLUGIN));
    let config = GeneratorConfig {
        contracts: ContractSet::from_names(["com.example.Extension"]).unwrap(),
        ..module.config()
    };

    // its.NotChecked's interface is missing, so resolving it fails.
    run_generate(&config).assert_failure("SVC_001");

    fs::remove_file(module.classes_dir.join("its/NotChecked.class")).unwrap();
    run_generate(&config).assert_success();
    assert_eq!(
        fs::read_to_string(module.services_dir().join("com.example.Extension")).unwrap(),
        "its.Ext"
    );
}
