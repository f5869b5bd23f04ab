//! Error types for discovery, validation, and descriptor output.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while decoding the header of a compiled class file.
#[derive(Debug, Error)]
pub enum ClassFormatError {
    /// The file does not start with `0xCAFEBABE`.
    #[error("bad magic number 0x{0:08X}")]
    BadMagic(u32),

    /// The file ended before the header was complete.
    #[error("truncated class file: {0}")]
    Truncated(#[from] io::Error),

    /// A constant pool entry carries a tag this parser does not know.
    #[error("unknown constant pool tag {tag} at index {index}")]
    BadConstantTag {
        /// Constant pool index of the offending entry.
        index: u16,
        /// The raw tag byte.
        tag: u8,
    },

    /// A constant pool reference points at the wrong kind of entry.
    #[error("constant pool index {index} is not a {expected} entry")]
    BadConstantIndex {
        /// The referenced index.
        index: u16,
        /// The entry kind the reference requires.
        expected: &'static str,
    },
}

/// Errors raised while resolving a type name against the assembled classpath.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// No classpath entry contains the type.
    #[error("class {name} was not found on the module classpath")]
    NotFound {
        /// Fully-qualified name of the missing type.
        name: String,
    },

    /// The class file was found but could not be decoded.
    #[error("class {name} in {} is malformed: {source}", .location.display())]
    Malformed {
        /// Fully-qualified name that was requested.
        name: String,
        /// Classpath entry the bytes came from.
        location: PathBuf,
        /// Decoding failure.
        #[source]
        source: ClassFormatError,
    },

    /// The class file declares a different name than its path implies.
    #[error("class file for {requested} in {} declares {declared}", .location.display())]
    NameMismatch {
        /// Name derived from the file path.
        requested: String,
        /// Name found in the class file's `this_class` entry.
        declared: String,
        /// Classpath entry the bytes came from.
        location: PathBuf,
    },

    /// Reading a class file from a directory entry failed.
    #[error("failed to read class {name} from {}: {source}", .location.display())]
    Io {
        /// Fully-qualified name that was requested.
        name: String,
        /// Directory entry being read.
        location: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A dependency archive could not be opened or read.
    #[error("failed to read archive {}: {source}", .location.display())]
    Archive {
        /// Path of the archive.
        location: PathBuf,
        /// Underlying archive error.
        #[source]
        source: zip::result::ZipError,
    },

    /// The supertype graph loops back on itself.
    #[error("class {name} has a cyclic supertype hierarchy")]
    CyclicHierarchy {
        /// A type on the cycle.
        name: String,
    },
}

impl ResolveError {
    /// Fully-qualified name of the type that failed to resolve, when known.
    pub fn type_name(&self) -> Option<&str> {
        match self {
            ResolveError::NotFound { name }
            | ResolveError::Malformed { name, .. }
            | ResolveError::Io { name, .. }
            | ResolveError::CyclicHierarchy { name } => Some(name),
            ResolveError::NameMismatch { requested, .. } => Some(requested),
            ResolveError::Archive { .. } => None,
        }
    }
}

/// Errors raised while building a generator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A contract name is not a valid fully-qualified type name.
    #[error("invalid contract name '{0}' (expected a fully-qualified type name)")]
    InvalidContractName(String),

    /// A contract set must name at least one contract.
    #[error("at least one extension contract is required")]
    NoContracts,

    /// The same contract was listed twice.
    #[error("contract {0} is listed more than once")]
    DuplicateContract(String),
}

/// Top-level error for a descriptor generation run.
///
/// Every variant aborts the run; none are retried.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// A required type could not be resolved while scanning.
    #[error(
        "Error scanning for classes implementing {}: {source}",
        and_list(.contracts)
    )]
    Resolution {
        /// All known contract names.
        contracts: Vec<String>,
        /// The resolution failure, naming the offending type.
        #[source]
        source: ResolveError,
    },

    /// No compiled type implements any known contract.
    #[error("You must have at least one class that implements {}.", or_list(.contracts))]
    NoImplementation {
        /// All known contract names.
        contracts: Vec<String>,
    },

    /// Compiled types implement more than one contract kind.
    #[error(
        "You have classes that implement multiple of {}. You can only have one plugin implementation per project.",
        or_list(.contracts)
    )]
    MultipleContractKinds {
        /// All known contract names.
        contracts: Vec<String>,
    },

    /// More than one compiled type implements the detected contract.
    #[error(
        "You have more than one class that implements {contract}:\n\n{}\nYou can only have one per plugin project.",
        line_list(.implementations)
    )]
    AmbiguousImplementation {
        /// The detected contract.
        contract: String,
        /// Every implementation found, in enumeration order.
        implementations: Vec<String>,
    },

    /// The descriptor's parent directory could not be created.
    #[error("Failed to create directory: {}", .path.display())]
    DirectoryCreation {
        /// Directory that should exist.
        path: PathBuf,
        /// The creation failure, if the filesystem reported one.
        #[source]
        source: Option<io::Error>,
    },

    /// The descriptor file could not be written.
    #[error("Failed to write service descriptor {}.", .path.display())]
    DescriptorWrite {
        /// Descriptor path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Walking the compiled-classes directory failed.
    #[error("Failed to scan compiled classes in {}: {source}", .path.display())]
    Scan {
        /// The compiled-classes directory.
        path: PathBuf,
        /// Underlying walk error.
        #[source]
        source: walkdir::Error,
    },

    /// The generator configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl GenerateError {
    /// Returns the stable error code for reporting (e.g., "SVC_001").
    pub fn code(&self) -> &'static str {
        match self {
            GenerateError::Resolution { .. } => "SVC_001",
            GenerateError::NoImplementation { .. } => "SVC_002",
            GenerateError::MultipleContractKinds { .. } => "SVC_003",
            GenerateError::AmbiguousImplementation { .. } => "SVC_004",
            GenerateError::DirectoryCreation { .. } => "SVC_005",
            GenerateError::DescriptorWrite { .. } => "SVC_006",
            GenerateError::Scan { .. } => "SVC_007",
            GenerateError::Config(_) => "SVC_008",
        }
    }
}

/// Joins names as "A, B, or C".
pub(crate) fn or_list(names: &[String]) -> String {
    conjunction_list(names, "or")
}

/// Joins names as "A, B, and C".
pub(crate) fn and_list(names: &[String]) -> String {
    conjunction_list(names, "and")
}

fn conjunction_list(names: &[String], conjunction: &str) -> String {
    match names {
        [] => String::new(),
        [only] => only.clone(),
        [first, second] => format!("{} {} {}", first, conjunction, second),
        [init @ .., last] => format!("{}, {} {}", init.join(", "), conjunction, last),
    }
}

fn line_list(names: &[String]) -> String {
    names.iter().map(|name| format!("{}\n", name)).collect()
}
