//! Sink for human-readable progress lines.

/// Receives informational lines from a generation run.
///
/// The command-line front end prints them; tests collect them.
pub trait LogSink {
    /// Records one informational line.
    fn info(&mut self, message: &str);
}

impl LogSink for Vec<String> {
    fn info(&mut self, message: &str) {
        self.push(message.to_string());
    }
}

/// Discards every line.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLog;

impl LogSink for NullLog {
    fn info(&mut self, _message: &str) {}
}
