// src/report.rs

//! Run reporting collaborator.
//!
//! The pipelines emit activity through an injected `Reporter` instead of
//! a process-wide log handle, so embedders can route events to their own
//! sink and tests can capture them in memory. Diagnostic logging still
//! goes through the `log` facade.

use std::sync::Mutex;

use crate::models::RunSummary;

/// Sink for run-level activity and final tallies.
pub trait Reporter: Send + Sync {
    /// Record a notable pipeline event (mention found, record written).
    fn activity(&self, message: &str);

    /// Hand over the final tallies for a run.
    fn summary(&self, summary: &RunSummary);
}

/// Reporter that forwards to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn activity(&self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self, summary: &RunSummary) {
        log::info!("Run summary: {summary}");
    }
}

/// In-memory reporter.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    events: Mutex<Vec<String>>,
    summaries: Mutex<Vec<RunSummary>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events recorded so far.
    pub fn events(&self) -> Vec<String> {
        self.events.lock().expect("reporter lock").clone()
    }

    /// Summaries recorded so far.
    pub fn summaries(&self) -> Vec<RunSummary> {
        self.summaries.lock().expect("reporter lock").clone()
    }
}

impl Reporter for MemoryReporter {
    fn activity(&self, message: &str) {
        self.events.lock().expect("reporter lock").push(message.to_string());
    }

    fn summary(&self, summary: &RunSummary) {
        self.summaries.lock().expect("reporter lock").push(*summary);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_reporter_captures_events_and_summaries() {
        let reporter = MemoryReporter::new();
        reporter.activity("found something");
        reporter.summary(&RunSummary::default());

        assert_eq!(reporter.events(), vec!["found something"]);
        assert_eq!(reporter.summaries().len(), 1);
    }
}
