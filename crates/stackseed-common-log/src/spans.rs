//! Span and timing helpers.

use tracing::{info_span, Span};

/// Create a span for one scaffold run.
pub fn scaffold_span(project: &str, kind: &str) -> Span {
    info_span!("scaffold", project = %project, kind = %kind)
}

/// Create a span for an external command.
pub fn command_span(name: &str, program: &str) -> Span {
    info_span!("command", name = %name, program = %program)
}

/// Timing utility for operations.
pub struct Timer {
    start: std::time::Instant,
    operation: &'static str,
}

impl Timer {
    /// Start a new timer.
    pub fn start(operation: &'static str) -> Self {
        Self {
            start: std::time::Instant::now(),
            operation,
        }
    }

    /// Complete the timer and record duration.
    pub fn finish(self) {
        let duration = self.start.elapsed();
        tracing::debug!(
            operation = %self.operation,
            duration_ms = %duration.as_millis(),
            "operation completed"
        );
    }
}
