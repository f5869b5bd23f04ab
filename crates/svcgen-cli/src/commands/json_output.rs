//! JSON output types for machine-readable CLI output.
//!
//! These types back the `--json` flag on `generate` and `scan`, so build
//! tooling can consume results without parsing colored text.

use serde::{Deserialize, Serialize};
use std::path::Path;
use svcgen_core::{GenerateError, GenerationOutcome, MatchResult, Selection};

use crate::input::InputError;

/// Error codes for CLI operations.
///
/// These codes are stable and can be used for programmatic error handling.
/// Format: CLI_XXX for CLI-level errors; generation errors pass through
/// their SVC_XXX codes.
pub mod error_codes {
    /// File could not be read
    pub const FILE_READ: &str = "CLI_001";
    /// Classpath manifest could not be parsed
    pub const MANIFEST_PARSE: &str = "CLI_002";
    /// Invalid contract given on the command line
    pub const INVALID_CONTRACT: &str = "CLI_003";
}

/// A structured error in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonError {
    /// Stable error code (e.g., "CLI_001", "SVC_004")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// File the error refers to (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Suggestion for fixing the error (if available)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl JsonError {
    /// Creates a new error with code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            file: None,
            suggestion: None,
        }
    }

    /// Sets the file path for this error.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Sets a suggestion for fixing the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Converts an input error into a JSON error.
pub fn input_error_to_json(err: &InputError) -> JsonError {
    match err {
        InputError::FileRead { path, .. } => {
            JsonError::new(error_codes::FILE_READ, err.to_string())
                .with_file(path.display().to_string())
        }
        InputError::ManifestParse { path, .. } => {
            JsonError::new(error_codes::MANIFEST_PARSE, err.to_string())
                .with_file(path.display().to_string())
        }
        InputError::Contract(_) => JsonError::new(error_codes::INVALID_CONTRACT, err.to_string()),
    }
}

/// Converts a generation error into a JSON error, keeping its SVC code.
pub fn generate_error_to_json(err: &GenerateError) -> JsonError {
    let error = JsonError::new(err.code(), err.to_string());
    match err {
        GenerateError::Resolution { source, .. } => match source.type_name() {
            Some(name) => error.with_suggestion(format!(
                "Add the dependency that provides {} to the classpath",
                name
            )),
            None => error,
        },
        GenerateError::AmbiguousImplementation { .. } => error.with_suggestion(
            "Keep one implementation, or write the service descriptor by hand to choose one",
        ),
        GenerateError::DirectoryCreation { path, .. }
        | GenerateError::DescriptorWrite { path, .. }
        | GenerateError::Scan { path, .. } => error.with_file(path.display().to_string()),
        _ => error,
    }
}

/// BLAKE3 hash (hex) of a descriptor file's content, if it can be read.
pub fn descriptor_hash(path: &Path) -> Option<String> {
    std::fs::read(path)
        .ok()
        .map(|content| blake3::hash(&content).to_hex().to_string())
}

/// JSON output for the `generate` command.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateOutput {
    /// Whether generation succeeded
    pub success: bool,
    /// Errors encountered
    pub errors: Vec<JsonError>,
    /// Generation result (on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<GenerateResult>,
    /// Progress lines emitted during the run
    pub log: Vec<String>,
}

/// Generation result details.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateResult {
    /// How the run ended
    #[serde(flatten)]
    pub outcome: GenerationOutcome,
    /// BLAKE3 hash of the descriptor the run produced or found
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
}

impl GenerateResult {
    /// Wraps an outcome, hashing the descriptor it refers to.
    pub fn from_outcome(outcome: GenerationOutcome) -> Self {
        let content_hash = match &outcome {
            GenerationOutcome::Disabled => None,
            GenerationOutcome::DescriptorPresent { path } => descriptor_hash(path),
            GenerationOutcome::Generated { descriptor } => descriptor_hash(&descriptor.path),
        };
        Self {
            outcome,
            content_hash,
        }
    }
}

impl GenerateOutput {
    /// Creates a successful generate output.
    pub fn success(result: GenerateResult, log: Vec<String>) -> Self {
        Self {
            success: true,
            errors: Vec::new(),
            result: Some(result),
            log,
        }
    }

    /// Creates a failed generate output.
    pub fn failure(errors: Vec<JsonError>, log: Vec<String>) -> Self {
        Self {
            success: false,
            errors,
            result: None,
            log,
        }
    }
}

/// JSON output for the `scan` command.
#[derive(Debug, Clone, Serialize)]
pub struct ScanOutput {
    /// Whether scanning succeeded
    pub success: bool,
    /// Errors encountered while scanning
    pub errors: Vec<JsonError>,
    /// Scan result (on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ScanResult>,
}

/// Scan result details.
#[derive(Debug, Clone, Serialize)]
pub struct ScanResult {
    /// The scanned compiled-classes directory
    pub classes_dir: String,
    /// Number of classpath entries used for resolution
    pub classpath_entries: usize,
    /// Implementations found per contract
    pub matches: MatchResult,
    /// The implementation `generate` would select
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection: Option<Selection>,
    /// Why `generate` would fail, if it would
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_error: Option<JsonError>,
}

impl ScanOutput {
    /// Creates a successful scan output.
    pub fn success(result: ScanResult) -> Self {
        Self {
            success: true,
            errors: Vec::new(),
            result: Some(result),
        }
    }

    /// Creates a failed scan output.
    pub fn failure(errors: Vec<JsonError>) -> Self {
        Self {
            success: false,
            errors,
            result: None,
        }
    }
}
