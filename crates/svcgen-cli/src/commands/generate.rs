//! Generate command implementation
//!
//! Discovers the module's plugin implementation and writes its service
//! descriptor.

use anyhow::{Context, Result};
use colored::Colorize;
use std::process::ExitCode;
use svcgen_core::{generate, GenerateError, GenerationOutcome, WriteOutcome};

use super::json_output::{
    generate_error_to_json, input_error_to_json, GenerateOutput, GenerateResult,
};
use crate::console::ConsoleLog;
use crate::input::ModuleInput;

/// Run the generate command
///
/// # Arguments
/// * `input` - The module's classes directory, classpath and contracts
/// * `descriptor` - Optional override for the primary descriptor path
/// * `skip` - Disable generation
/// * `json_output` - Whether to output machine-readable JSON
///
/// # Returns
/// Exit code: 0 on success (including no-op runs), 1 on failure
pub fn run(
    input: &ModuleInput,
    descriptor: Option<&str>,
    skip: bool,
    json_output: bool,
) -> Result<ExitCode> {
    if json_output {
        run_json(input, descriptor, skip)
    } else {
        run_human(input, descriptor, skip)
    }
}

/// Run generate with human-readable (colored) output
fn run_human(input: &ModuleInput, descriptor: Option<&str>, skip: bool) -> Result<ExitCode> {
    println!(
        "{} {}",
        "Generating:".cyan().bold(),
        input.classes_dir.display()
    );

    let mut builder = input
        .config_builder()
        .context("Failed to read module inputs")?
        .skip(skip);
    if let Some(path) = descriptor {
        builder = builder.descriptor_path(path);
    }
    let config = builder.build();

    match generate(&config, &mut ConsoleLog) {
        Ok(outcome) => {
            print_outcome(&outcome);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            print_failure(&e);
            Ok(ExitCode::from(1))
        }
    }
}

fn print_outcome(outcome: &GenerationOutcome) {
    match outcome {
        GenerationOutcome::Disabled => {}
        GenerationOutcome::DescriptorPresent { path } => {
            println!(
                "{} {} already exists, nothing to do",
                "Descriptor:".dimmed(),
                path.display()
            );
        }
        GenerationOutcome::Generated { descriptor } => {
            if descriptor.outcome == WriteOutcome::AlreadyPresent {
                println!(
                    "  {} {} already exists and was left unchanged",
                    "!".yellow(),
                    descriptor.path.display()
                );
            }
            println!(
                "\n{} {} implements {}",
                "SUCCESS".green().bold(),
                descriptor.selection.implementation,
                descriptor.selection.contract
            );
        }
    }
}

fn print_failure(err: &GenerateError) {
    println!("\n{} [{}]", "FAILED".red().bold(), err.code());
    for line in err.to_string().lines() {
        println!("  {}", line);
    }
}

/// Run generate with machine-readable JSON output
fn run_json(input: &ModuleInput, descriptor: Option<&str>, skip: bool) -> Result<ExitCode> {
    let mut builder = match input.config_builder() {
        Ok(builder) => builder.skip(skip),
        Err(e) => {
            let output = GenerateOutput::failure(vec![input_error_to_json(&e)], Vec::new());
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(ExitCode::from(1));
        }
    };
    if let Some(path) = descriptor {
        builder = builder.descriptor_path(path);
    }
    let config = builder.build();

    let mut log: Vec<String> = Vec::new();
    let (output, code) = match generate(&config, &mut log) {
        Ok(outcome) => (
            GenerateOutput::success(GenerateResult::from_outcome(outcome), log),
            ExitCode::SUCCESS,
        ),
        Err(e) => (
            GenerateOutput::failure(vec![generate_error_to_json(&e)], log),
            ExitCode::from(1),
        ),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(code)
}
