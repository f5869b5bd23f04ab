//! Test fixture utilities for creating synthetic plugin modules.

use std::fs;
use std::path::{Path, PathBuf};
use svcgen_core::testing::{write_jar, ClassBytes};
use svcgen_core::{
    Dependency, DependencyScope, GeneratorConfig, COORDINATOR_PLUGIN, PLUGIN, ROUTER_PLUGIN,
    SERVICES_DIR,
};
use tempfile::TempDir;

/// Coordinates used for the synthesized SPI jar.
pub const SPI_COORDINATES: &str = "com.facebook.presto:presto-spi:0.290";

/// A plugin module on disk: a compiled-classes directory plus a local
/// repository of dependency jars.
pub struct PluginModuleFixture {
    pub root: TempDir,
    pub classes_dir: PathBuf,
    pub repo_dir: PathBuf,
    dependencies: Vec<Dependency>,
}

impl PluginModuleFixture {
    /// Create a module with no classes and no dependencies.
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp dir");
        let classes_dir = root.path().join("target").join("classes");
        let repo_dir = root.path().join("repository");
        fs::create_dir_all(&classes_dir).expect("Failed to create classes dir");
        fs::create_dir_all(&repo_dir).expect("Failed to create repository dir");
        Self {
            root,
            classes_dir,
            repo_dir,
            dependencies: Vec::new(),
        }
    }

    /// Create a module that depends on a jar providing the three Presto
    /// plugin contracts, in provided scope.
    pub fn with_presto_spi() -> Self {
        let mut module = Self::new();
        let jar = module.add_jar(
            "presto-spi.jar",
            &[
                ClassBytes::interface(PLUGIN),
                ClassBytes::interface(COORDINATOR_PLUGIN),
                ClassBytes::interface(ROUTER_PLUGIN),
            ],
        );
        module.add_dependency(
            Dependency::with_file(SPI_COORDINATES, jar).scope(DependencyScope::Provided),
        );
        module
    }

    /// Get the module root path.
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Compile a class into the module's output directory.
    pub fn add_class(&self, class: ClassBytes) -> PathBuf {
        class
            .write_to(&self.classes_dir)
            .expect("Failed to write class file")
    }

    /// Write a jar into the local repository without adding it to the
    /// classpath.
    pub fn add_jar(&self, file_name: &str, classes: &[ClassBytes]) -> PathBuf {
        let path = self.repo_dir.join(file_name);
        write_jar(&path, classes, &[]).expect("Failed to write jar");
        path
    }

    /// Append a dependency to the module's classpath.
    pub fn add_dependency(&mut self, dependency: Dependency) {
        self.dependencies.push(dependency);
    }

    /// Write a jar and append it to the classpath in compile scope.
    pub fn add_dependency_jar(&mut self, file_name: &str, classes: &[ClassBytes]) -> PathBuf {
        let path = self.add_jar(file_name, classes);
        self.add_dependency(Dependency::with_file(file_name, &path));
        path
    }

    /// Generator configuration for this module with the default contracts.
    pub fn config(&self) -> GeneratorConfig {
        GeneratorConfig::builder(&self.classes_dir)
            .dependencies(self.dependencies.clone())
            .build()
    }

    /// Writes the module's dependencies as a classpath manifest and returns
    /// its path.
    pub fn write_manifest(&self) -> PathBuf {
        let path = self.path().join("classpath.json");
        let manifest = serde_json::json!({ "dependencies": self.dependencies });
        fs::write(
            &path,
            serde_json::to_string_pretty(&manifest).expect("Failed to serialize manifest"),
        )
        .expect("Failed to write manifest");
        path
    }

    /// The services directory under the compiled-classes directory.
    pub fn services_dir(&self) -> PathBuf {
        self.classes_dir.join(SERVICES_DIR)
    }

    /// Default descriptor path for a contract.
    pub fn descriptor_path(&self, contract: &str) -> PathBuf {
        self.services_dir().join(contract)
    }

    /// Read a descriptor's content, or None if it was not written.
    pub fn read_descriptor(&self, contract: &str) -> Option<String> {
        fs::read_to_string(self.descriptor_path(contract)).ok()
    }

    /// Names of every file in the services directory, sorted.
    pub fn descriptor_files(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(self.services_dir()) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

impl Default for PluginModuleFixture {
    fn default() -> Self {
        Self::new()
    }
}
