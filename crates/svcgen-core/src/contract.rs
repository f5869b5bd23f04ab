//! Extension-point contracts and descriptor path derivation.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Directory, relative to the output root, holding service descriptors.
pub const SERVICES_DIR: &str = "META-INF/services";

/// Primary plugin contract.
pub const PLUGIN: &str = "com.facebook.presto.spi.Plugin";

/// Coordinator-only plugin contract.
pub const COORDINATOR_PLUGIN: &str = "com.facebook.presto.spi.CoordinatorPlugin";

/// Router plugin contract.
pub const ROUTER_PLUGIN: &str = "com.facebook.presto.spi.RouterPlugin";

/// Dotted Java binary name: identifier segments separated by '.'. Segments
/// may use any Unicode letter, and digits and combining marks after the first
/// character.
const BINARY_NAME_PATTERN: &str =
    r"^[\p{L}_$][\p{L}\p{N}\p{M}_$]*(\.[\p{L}_$][\p{L}\p{N}\p{M}_$]*)*$";

static BINARY_NAME_REGEX: OnceLock<Regex> = OnceLock::new();

fn binary_name_regex() -> &'static Regex {
    BINARY_NAME_REGEX.get_or_init(|| Regex::new(BINARY_NAME_PATTERN).expect("invalid regex pattern"))
}

/// Returns true if `name` is a valid dotted type name.
pub fn is_valid_type_name(name: &str) -> bool {
    binary_name_regex().is_match(name)
}

/// A named type contract that plugin classes implement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ExtensionContract {
    name: String,
}

impl ExtensionContract {
    /// Creates a contract from a fully-qualified type name.
    pub fn new(name: impl Into<String>) -> Result<Self, ConfigError> {
        let name = name.into();
        if !is_valid_type_name(&name) {
            return Err(ConfigError::InvalidContractName(name));
        }
        Ok(Self { name })
    }

    /// Fully-qualified type name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl TryFrom<String> for ExtensionContract {
    type Error = ConfigError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        Self::new(name)
    }
}

impl From<ExtensionContract> for String {
    fn from(contract: ExtensionContract) -> Self {
        contract.name
    }
}

impl std::fmt::Display for ExtensionContract {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// The ordered set of contracts a module may implement.
///
/// The first contract is primary: its descriptor lives at the configured
/// descriptor path. Every other contract writes a sibling file named after
/// the contract itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractSet {
    contracts: Vec<ExtensionContract>,
}

impl ContractSet {
    /// Builds a contract set; the first entry is primary.
    pub fn new(contracts: Vec<ExtensionContract>) -> Result<Self, ConfigError> {
        if contracts.is_empty() {
            return Err(ConfigError::NoContracts);
        }
        let mut seen = HashSet::new();
        for contract in &contracts {
            if !seen.insert(contract.name()) {
                return Err(ConfigError::DuplicateContract(contract.name().to_string()));
            }
        }
        Ok(Self { contracts })
    }

    /// Parses a list of contract names; the first is primary.
    pub fn from_names<I, S>(names: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let contracts = names
            .into_iter()
            .map(ExtensionContract::new)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(contracts)
    }

    /// The Presto plugin contracts: Plugin, CoordinatorPlugin, RouterPlugin.
    pub fn presto() -> Self {
        Self {
            contracts: [PLUGIN, COORDINATOR_PLUGIN, ROUTER_PLUGIN]
                .into_iter()
                .map(|name| ExtensionContract {
                    name: name.to_string(),
                })
                .collect(),
        }
    }

    /// The primary contract.
    pub fn primary(&self) -> &ExtensionContract {
        &self.contracts[0]
    }

    /// Returns true if `contract` is the primary contract.
    pub fn is_primary(&self, contract: &ExtensionContract) -> bool {
        self.primary() == contract
    }

    /// Contracts in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, ExtensionContract> {
        self.contracts.iter()
    }

    /// Number of contracts.
    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    /// Always false; a contract set is never empty.
    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }

    /// Contract names in declaration order.
    pub fn names(&self) -> Vec<String> {
        self.contracts.iter().map(|c| c.name().to_string()).collect()
    }

    /// Default descriptor path for the primary contract under `output_dir`.
    pub fn default_descriptor_path(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(SERVICES_DIR).join(self.primary().name())
    }

    /// Descriptor path for `contract`, given the primary descriptor path.
    pub fn descriptor_path(&self, contract: &ExtensionContract, primary_path: &Path) -> PathBuf {
        if self.is_primary(contract) {
            return primary_path.to_path_buf();
        }
        match primary_path.parent() {
            Some(parent) => parent.join(contract.name()),
            None => PathBuf::from(contract.name()),
        }
    }
}

impl Default for ContractSet {
    fn default() -> Self {
        Self::presto()
    }
}

impl<'a> IntoIterator for &'a ContractSet {
    type Item = &'a ExtensionContract;
    type IntoIter = std::slice::Iter<'a, ExtensionContract>;

    fn into_iter(self) -> Self::IntoIter {
        self.contracts.iter()
    }
}
