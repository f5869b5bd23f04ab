//! Descriptor generation: the one operation a build step invokes.

use std::path::PathBuf;

use serde::Serialize;

use crate::classpath::{Classpath, Dependency};
use crate::contract::ContractSet;
use crate::descriptor::{write_descriptor, WriteOutcome};
use crate::enumerate::enumerate_classes;
use crate::error::GenerateError;
use crate::log::LogSink;
use crate::matcher::{match_contracts, MatchResult};
use crate::resolver::TypeResolver;
use crate::selection::{select, Selection};

/// Log line emitted when generation is disabled.
pub const SKIP_MESSAGE: &str = "Skipping service descriptor generation";

/// Inputs for one generation run.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// The module's compiled-classes directory (also the output root).
    pub classes_dir: PathBuf,
    /// Primary descriptor path; defaults to
    /// `<classes_dir>/META-INF/services/<primary contract>`.
    pub descriptor_path: Option<PathBuf>,
    /// Compile-time dependencies with their resolved files.
    pub dependencies: Vec<Dependency>,
    /// Known contracts, primary first.
    pub contracts: ContractSet,
    /// Disables generation entirely.
    pub skip: bool,
}

impl GeneratorConfig {
    /// Starts a builder for the given compiled-classes directory.
    pub fn builder(classes_dir: impl Into<PathBuf>) -> GeneratorConfigBuilder {
        GeneratorConfigBuilder::new(classes_dir)
    }

    /// The effective primary descriptor path.
    pub fn primary_descriptor_path(&self) -> PathBuf {
        match &self.descriptor_path {
            Some(path) => path.clone(),
            None => self.contracts.default_descriptor_path(&self.classes_dir),
        }
    }

    /// The classpath for this module.
    pub fn classpath(&self) -> Classpath {
        Classpath::assemble(&self.classes_dir, &self.dependencies)
    }
}

/// Builder for [`GeneratorConfig`].
#[derive(Debug, Clone)]
pub struct GeneratorConfigBuilder {
    config: GeneratorConfig,
}

impl GeneratorConfigBuilder {
    /// Creates a builder with the Presto contracts and no dependencies.
    pub fn new(classes_dir: impl Into<PathBuf>) -> Self {
        Self {
            config: GeneratorConfig {
                classes_dir: classes_dir.into(),
                descriptor_path: None,
                dependencies: Vec::new(),
                contracts: ContractSet::default(),
                skip: false,
            },
        }
    }

    /// Overrides the primary descriptor path.
    pub fn descriptor_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.descriptor_path = Some(path.into());
        self
    }

    /// Adds a dependency.
    pub fn dependency(mut self, dependency: Dependency) -> Self {
        self.config.dependencies.push(dependency);
        self
    }

    /// Adds several dependencies.
    pub fn dependencies(mut self, dependencies: impl IntoIterator<Item = Dependency>) -> Self {
        self.config.dependencies.extend(dependencies);
        self
    }

    /// Replaces the contract set.
    pub fn contracts(mut self, contracts: ContractSet) -> Self {
        self.config.contracts = contracts;
        self
    }

    /// Sets the skip flag.
    pub fn skip(mut self, skip: bool) -> Self {
        self.config.skip = skip;
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> GeneratorConfig {
        self.config
    }
}

/// A descriptor produced (or found) by a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DescriptorRecord {
    /// The selected contract and implementation.
    #[serde(flatten)]
    pub selection: Selection,
    /// Descriptor path.
    pub path: PathBuf,
    /// Whether the file was written or already present.
    pub outcome: WriteOutcome,
}

/// How a successful run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GenerationOutcome {
    /// The skip flag was set.
    Disabled,
    /// The primary descriptor already existed; nothing was scanned.
    DescriptorPresent {
        /// The existing primary descriptor.
        path: PathBuf,
    },
    /// Scanning selected an implementation.
    Generated {
        /// The descriptor for the selected contract.
        descriptor: DescriptorRecord,
    },
}

/// Discovers the module's implementations of every known contract.
///
/// Builds the classpath and a fresh resolution scope, enumerates the
/// compiled classes, and matches them against each contract. No policy is
/// applied and nothing is written.
pub fn scan(config: &GeneratorConfig) -> Result<MatchResult, GenerateError> {
    let classpath = config.classpath();
    let candidates = enumerate_classes(&config.classes_dir)?;
    let mut resolver = TypeResolver::new(&classpath);
    match_contracts(&mut resolver, &config.contracts, &candidates).map_err(|source| {
        GenerateError::Resolution {
            contracts: config.contracts.names(),
            source,
        }
    })
}

/// Generates the service descriptor for a module.
///
/// Does nothing when the skip flag is set or when the primary descriptor
/// already exists. Otherwise scans, applies the selection policy, and
/// writes the selected implementation's descriptor.
pub fn generate(
    config: &GeneratorConfig,
    log: &mut dyn LogSink,
) -> Result<GenerationOutcome, GenerateError> {
    if config.skip {
        log.info(SKIP_MESSAGE);
        return Ok(GenerationOutcome::Disabled);
    }

    let primary_path = config.primary_descriptor_path();
    if primary_path.is_file() {
        return Ok(GenerationOutcome::DescriptorPresent { path: primary_path });
    }

    let matches = scan(config)?;
    let selection = select(&config.contracts, &matches)?;
    let path = config
        .contracts
        .descriptor_path(&selection.contract, &primary_path);
    let outcome = write_descriptor(&selection, &path, &config.classes_dir, log)?;

    Ok(GenerationOutcome::Generated {
        descriptor: DescriptorRecord {
            selection,
            path,
            outcome,
        },
    })
}
