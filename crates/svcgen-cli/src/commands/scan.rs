//! Scan command implementation
//!
//! Lists the implementations of every contract without writing anything.

use anyhow::{Context, Result};
use colored::Colorize;
use std::process::ExitCode;
use svcgen_core::{scan, select, ContractSet, GeneratorConfig, MatchResult};

use super::json_output::{
    generate_error_to_json, input_error_to_json, ScanOutput, ScanResult,
};
use crate::input::ModuleInput;

/// Run the scan command
///
/// # Returns
/// Exit code: 0 if scanning succeeded (even when `generate` would reject the
/// result), 1 if it failed
pub fn run(input: &ModuleInput, json_output: bool) -> Result<ExitCode> {
    if json_output {
        run_json(input)
    } else {
        run_human(input)
    }
}

/// Run scan with human-readable (colored) output
fn run_human(input: &ModuleInput) -> Result<ExitCode> {
    println!(
        "{} {}",
        "Scanning:".cyan().bold(),
        input.classes_dir.display()
    );

    let config = input
        .config_builder()
        .context("Failed to read module inputs")?
        .build();
    println!("{} {} entries", "Classpath:".dimmed(), config.classpath().len());

    let matches = match scan(&config) {
        Ok(matches) => matches,
        Err(e) => {
            println!("\n{} [{}]", "FAILED".red().bold(), e.code());
            println!("  {}", e);
            return Ok(ExitCode::from(1));
        }
    };

    print_matches(&config.contracts, &matches);

    match select(&config.contracts, &matches) {
        Ok(selection) => println!(
            "\n{} {} implements {}",
            "Selected:".green().bold(),
            selection.implementation,
            selection.contract
        ),
        Err(e) => {
            println!("\n{} [{}]", "Not generatable:".yellow().bold(), e.code());
            for line in e.to_string().lines() {
                println!("  {}", line);
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn print_matches(contracts: &ContractSet, matches: &MatchResult) {
    println!();
    for found in matches.iter() {
        let marker = if contracts.is_primary(&found.contract) {
            " (primary)".dimmed().to_string()
        } else {
            String::new()
        };
        println!("  {}{}", found.contract.name().bold(), marker);
        if found.implementations.is_empty() {
            println!("    {}", "(none)".dimmed());
        }
        for implementation in &found.implementations {
            println!("    - {}", implementation);
        }
    }
}

/// Run scan with machine-readable JSON output
fn run_json(input: &ModuleInput) -> Result<ExitCode> {
    let config: GeneratorConfig = match input.config_builder() {
        Ok(builder) => builder.build(),
        Err(e) => {
            let output = ScanOutput::failure(vec![input_error_to_json(&e)]);
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(ExitCode::from(1));
        }
    };

    let (output, code) = match scan(&config) {
        Ok(matches) => {
            let (selection, policy_error) = match select(&config.contracts, &matches) {
                Ok(selection) => (Some(selection), None),
                Err(e) => (None, Some(generate_error_to_json(&e))),
            };
            let result = ScanResult {
                classes_dir: input.classes_dir.display().to_string(),
                classpath_entries: config.classpath().len(),
                matches,
                selection,
                policy_error,
            };
            (ScanOutput::success(result), ExitCode::SUCCESS)
        }
        Err(e) => (
            ScanOutput::failure(vec![generate_error_to_json(&e)]),
            ExitCode::from(1),
        ),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(code)
}
