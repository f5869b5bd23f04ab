//! Module inputs: the compiled-classes directory, the classpath manifest,
//! and contract overrides given on the command line.
//!
//! A build tool hands its resolved compile classpath to `svcgen` as a JSON
//! manifest:
//!
//! ```json
//! {
//!   "dependencies": [
//!     { "coordinates": "com.facebook.presto:presto-spi:0.290",
//!       "scope": "provided",
//!       "file": "/home/me/.m2/repository/.../presto-spi-0.290.jar" }
//!   ]
//! }
//! ```
//!
//! Relative `file` paths are resolved against the manifest's directory.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use svcgen_core::{ConfigError, ContractSet, Dependency, GeneratorConfig, GeneratorConfigBuilder};

/// A classpath manifest as written by the host build tool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClasspathManifest {
    /// Every declared dependency, in classpath order.
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
}

impl ClasspathManifest {
    /// Dependencies whose types are visible when compiling the module.
    pub fn compile_dependencies(&self) -> impl Iterator<Item = &Dependency> {
        self.dependencies
            .iter()
            .filter(|dependency| dependency.scope.is_compile_visible())
    }
}

/// Errors that can occur while reading module inputs.
#[derive(Debug)]
pub enum InputError {
    /// File could not be read.
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The manifest is not valid JSON or has the wrong shape.
    ManifestParse { path: PathBuf, message: String },

    /// A contract given on the command line is rejected.
    Contract(ConfigError),
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputError::FileRead { path, source } => {
                write!(f, "failed to read file '{}': {}", path.display(), source)
            }
            InputError::ManifestParse { path, message } => {
                write!(
                    f,
                    "invalid classpath manifest '{}': {}",
                    path.display(),
                    message
                )
            }
            InputError::Contract(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for InputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InputError::FileRead { source, .. } => Some(source),
            InputError::Contract(err) => Some(err),
            InputError::ManifestParse { .. } => None,
        }
    }
}

/// Loads a classpath manifest, resolving relative dependency files against
/// the manifest's directory.
pub fn load_manifest(path: &Path) -> Result<ClasspathManifest, InputError> {
    let content = std::fs::read_to_string(path).map_err(|e| InputError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut manifest: ClasspathManifest =
        serde_json::from_str(&content).map_err(|e| InputError::ManifestParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let base = path.parent().unwrap_or_else(|| Path::new(""));
    for dependency in &mut manifest.dependencies {
        if let Some(file) = dependency.file.as_mut() {
            if file.is_relative() {
                *file = base.join(&*file);
            }
        }
    }

    Ok(manifest)
}

/// Everything a command needs to know about the module being processed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleInput {
    /// The module's compiled-classes directory.
    pub classes_dir: PathBuf,
    /// Optional classpath manifest.
    pub manifest: Option<PathBuf>,
    /// Extra dependency files, appended after the manifest's entries.
    pub dependencies: Vec<PathBuf>,
    /// Contract names, primary first; empty means the Presto contracts.
    pub contracts: Vec<String>,
}

impl ModuleInput {
    /// Creates an input for a compiled-classes directory with no dependencies.
    pub fn new(classes_dir: impl Into<PathBuf>) -> Self {
        Self {
            classes_dir: classes_dir.into(),
            ..Self::default()
        }
    }

    /// The contract set to match against.
    pub fn contract_set(&self) -> Result<ContractSet, InputError> {
        if self.contracts.is_empty() {
            return Ok(ContractSet::presto());
        }
        ContractSet::from_names(&self.contracts).map_err(InputError::Contract)
    }

    /// The module's compile-time dependencies in classpath order.
    pub fn resolve_dependencies(&self) -> Result<Vec<Dependency>, InputError> {
        let mut dependencies = Vec::new();
        if let Some(path) = &self.manifest {
            let manifest = load_manifest(path)?;
            dependencies.extend(manifest.compile_dependencies().cloned());
        }
        dependencies.extend(
            self.dependencies
                .iter()
                .map(|file| Dependency::with_file(file.display().to_string(), file)),
        );
        Ok(dependencies)
    }

    /// Starts a generator configuration for this module.
    pub fn config_builder(&self) -> Result<GeneratorConfigBuilder, InputError> {
        Ok(GeneratorConfig::builder(&self.classes_dir)
            .contracts(self.contract_set()?)
            .dependencies(self.resolve_dependencies()?))
    }
}
