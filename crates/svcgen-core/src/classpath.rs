//! Classpath assembly from the module output directory and its dependencies.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Dependency scope as declared by the host build tool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyScope {
    /// Default scope, visible everywhere.
    #[default]
    Compile,
    /// Supplied by the runtime container; visible at compile time.
    Provided,
    /// Needed only at run time.
    Runtime,
    /// Needed only for tests.
    Test,
    /// Like provided, resolved from an explicit system path.
    System,
    /// Dependency-management import; never carries a file.
    Import,
}

impl DependencyScope {
    /// Returns the scope name as the build tool spells it.
    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyScope::Compile => "compile",
            DependencyScope::Provided => "provided",
            DependencyScope::Runtime => "runtime",
            DependencyScope::Test => "test",
            DependencyScope::System => "system",
            DependencyScope::Import => "import",
        }
    }

    /// Whether types from this scope are visible when compiling the module.
    pub fn is_compile_visible(&self) -> bool {
        matches!(
            self,
            DependencyScope::Compile | DependencyScope::Provided | DependencyScope::System
        )
    }
}

impl std::fmt::Display for DependencyScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A resolved (or unresolved) dependency of the module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// `group:artifact:version` coordinates, informational only.
    #[serde(default)]
    pub coordinates: String,
    /// Declared scope.
    #[serde(default)]
    pub scope: DependencyScope,
    /// Resolved artifact file, absent when the dependency has no file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Dependency {
    /// A compile-scope dependency with a resolved file.
    pub fn with_file(coordinates: impl Into<String>, file: impl Into<PathBuf>) -> Self {
        Self {
            coordinates: coordinates.into(),
            scope: DependencyScope::Compile,
            file: Some(file.into()),
        }
    }

    /// A dependency without a resolved file.
    pub fn unresolved(coordinates: impl Into<String>, scope: DependencyScope) -> Self {
        Self {
            coordinates: coordinates.into(),
            scope,
            file: None,
        }
    }

    /// Sets the scope.
    pub fn scope(mut self, scope: DependencyScope) -> Self {
        self.scope = scope;
        self
    }
}

/// One location types are resolved from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ClasspathEntry {
    /// A directory of loose class files.
    Directory(PathBuf),
    /// A jar (zip) archive.
    Archive(PathBuf),
}

impl ClasspathEntry {
    /// Classifies a path: existing directories are directory entries,
    /// everything else is treated as an archive.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if path.is_dir() {
            ClasspathEntry::Directory(path)
        } else {
            ClasspathEntry::Archive(path)
        }
    }

    /// The entry's filesystem location.
    pub fn path(&self) -> &Path {
        match self {
            ClasspathEntry::Directory(path) | ClasspathEntry::Archive(path) => path,
        }
    }
}

/// Ordered resolution locations; the module's own classes come first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classpath {
    entries: Vec<ClasspathEntry>,
}

impl Classpath {
    /// Assembles the classpath for a module.
    ///
    /// The compiled-classes directory is always the first entry. Every
    /// dependency with a resolved file follows in the given order;
    /// dependencies without a file are skipped. Existence is not checked.
    pub fn assemble(classes_dir: &Path, dependencies: &[Dependency]) -> Self {
        let mut entries = vec![ClasspathEntry::Directory(classes_dir.to_path_buf())];
        entries.extend(
            dependencies
                .iter()
                .filter_map(|dep| dep.file.as_deref())
                .map(ClasspathEntry::from_path),
        );
        Self { entries }
    }

    /// Entries in resolution order.
    pub fn entries(&self) -> &[ClasspathEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
