//! Test harness utilities for running generation and checking outcomes.

use svcgen_core::{generate, GenerateError, GenerationOutcome, GeneratorConfig};

/// Result of one generation run with its captured log.
#[derive(Debug)]
pub struct GenerationRun {
    pub result: Result<GenerationOutcome, GenerateError>,
    pub log: Vec<String>,
}

impl GenerationRun {
    /// Assert that the run succeeded and return its outcome.
    pub fn assert_success(&self) -> &GenerationOutcome {
        match &self.result {
            Ok(outcome) => outcome,
            Err(e) => panic!(
                "Generation failed with {}: {}\nlog: {:?}",
                e.code(),
                e,
                self.log
            ),
        }
    }

    /// Assert that the run failed with the given error code and return the
    /// error.
    pub fn assert_failure(&self, code: &str) -> &GenerateError {
        match &self.result {
            Ok(outcome) => panic!("Expected {} but generation succeeded: {:?}", code, outcome),
            Err(e) => {
                assert_eq!(e.code(), code, "unexpected error: {}", e);
                e
            }
        }
    }

    /// The failure message, or an empty string on success.
    pub fn message(&self) -> String {
        self.result
            .as_ref()
            .err()
            .map(|e| e.to_string())
            .unwrap_or_default()
    }
}

/// Run generation, capturing log lines.
pub fn run_generate(config: &GeneratorConfig) -> GenerationRun {
    let mut log: Vec<String> = Vec::new();
    let result = generate(config, &mut log);
    GenerationRun { result, log }
}
