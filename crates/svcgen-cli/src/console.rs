//! Console sink for generation progress lines.

use colored::Colorize;
use svcgen_core::LogSink;

/// Prints progress lines to stdout, highlighting descriptor writes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleLog;

impl LogSink for ConsoleLog {
    fn info(&mut self, message: &str) {
        match message.strip_prefix("Wrote ") {
            Some(rest) => println!("{} {}", "Wrote".green().bold(), rest),
            None => println!("{}", message.dimmed()),
        }
    }
}
