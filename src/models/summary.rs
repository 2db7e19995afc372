// src/models/summary.rs

//! Per-run counters.

use std::fmt;

/// Tallies for a single scan or double-check pass.
///
/// Reset at run start, reported at run end. Every run produces one, even
/// when nothing was found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Items consumed from the source
    pub processed: usize,

    /// Mentions extracted across all items
    pub found: usize,

    /// New records appended to the table
    pub added: usize,

    /// Mentions skipped because their key was already seen this run
    pub duplicate: usize,

    /// Existing rows updated by a merge
    pub updated: usize,

    /// Mentions whose key was already persisted (append was a no-op)
    pub ignored: usize,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "processed {}, found {}, added {}, duplicate {}, updated {}, ignored {}",
            self.processed, self.found, self.added, self.duplicate, self.updated, self.ignored
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_reads_like_a_log_line() {
        let summary = RunSummary {
            processed: 3,
            found: 2,
            added: 1,
            duplicate: 1,
            updated: 0,
            ignored: 0,
        };
        assert_eq!(
            summary.to_string(),
            "processed 3, found 2, added 1, duplicate 1, updated 0, ignored 0"
        );
    }
}
