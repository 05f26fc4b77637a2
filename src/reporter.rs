//! Diagnostics reporting for the compile pipeline.
//!
//! The pipeline never logs directly; callers pass in a [`Reporter`].

use parking_lot::Mutex;

use crate::record::SkipReason;
use crate::Registry;

/// Per-registry outcome of a compile pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistrySummary {
    /// Lines seen
    pub lines: usize,
    /// Records accepted
    pub records: usize,
    /// Lines skipped
    pub skipped: usize,
    /// Blocks produced by decomposition
    pub blocks: usize,
}

/// Receiver of pipeline diagnostics.
///
/// Implementations must be shareable across the parallel parse phase.
pub trait Reporter: Send + Sync {
    /// A line was dropped. `line_no` is 1-based.
    fn skipped_line(&self, registry: Registry, line_no: usize, line: &str, reason: SkipReason);

    /// A registry finished parsing.
    fn registry_done(&self, registry: Registry, summary: &RegistrySummary);
}

/// Reporter forwarding to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn skipped_line(&self, registry: Registry, line_no: usize, line: &str, reason: SkipReason) {
        // Headers and non-IP rows are expected in every file.
        if matches!(
            reason,
            SkipReason::TooFewFields | SkipReason::Status | SkipReason::UnknownType
        ) {
            log::trace!("{}:{}: skipped ({}): {}", registry, line_no, reason, line);
        } else {
            log::debug!("{}:{}: skipped ({}): {}", registry, line_no, reason, line);
        }
    }

    fn registry_done(&self, registry: Registry, summary: &RegistrySummary) {
        log::info!(
            "Compiled {}: {} records -> {} blocks ({} of {} lines skipped)",
            registry,
            summary.records,
            summary.blocks,
            summary.skipped,
            summary.lines
        );
    }
}

/// Reporter that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn skipped_line(
        &self,
        _registry: Registry,
        _line_no: usize,
        _line: &str,
        _reason: SkipReason,
    ) {
    }

    fn registry_done(&self, _registry: Registry, _summary: &RegistrySummary) {}
}

/// Reporter that records events, mainly for tests.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    skipped: Mutex<Vec<(Registry, usize, SkipReason)>>,
    summaries: Mutex<Vec<(Registry, RegistrySummary)>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skipped lines as (registry, line number, reason), sorted.
    pub fn skipped(&self) -> Vec<(Registry, usize, SkipReason)> {
        let mut skipped = self.skipped.lock().clone();
        skipped.sort_by_key(|(registry, line_no, _)| (*registry, *line_no));
        skipped
    }

    /// Summary recorded for a registry, if it was compiled.
    pub fn summary(&self, registry: Registry) -> Option<RegistrySummary> {
        self.summaries
            .lock()
            .iter()
            .find(|(r, _)| *r == registry)
            .map(|(_, s)| *s)
    }
}

impl Reporter for CollectingReporter {
    fn skipped_line(&self, registry: Registry, line_no: usize, _line: &str, reason: SkipReason) {
        self.skipped.lock().push((registry, line_no, reason));
    }

    fn registry_done(&self, registry: Registry, summary: &RegistrySummary) {
        self.summaries.lock().push((registry, *summary));
    }
}
