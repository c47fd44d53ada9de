//! Structural delta counters.
//!
//! Each reconcile call returns a [`ReconcileOutcome`] for its own unit of
//! work; a run-wide [`UpdateStats`] accumulates them behind atomics so
//! distinct types may be reconciled on different threads and still share
//! one tally.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Delta of one (type, framework) reconcile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub added: usize,
    pub removed: usize,
    pub unchanged: usize,
}

/// Run-wide accumulator.
#[derive(Debug, Default)]
pub struct UpdateStats {
    added: AtomicUsize,
    removed: AtomicUsize,
    unchanged: AtomicUsize,
}

impl UpdateStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, outcome: &ReconcileOutcome) {
        self.added.fetch_add(outcome.added, Ordering::Relaxed);
        self.removed.fetch_add(outcome.removed, Ordering::Relaxed);
        self.unchanged.fetch_add(outcome.unchanged, Ordering::Relaxed);
    }

    pub fn added(&self) -> usize {
        self.added.load(Ordering::Relaxed)
    }

    pub fn removed(&self) -> usize {
        self.removed.load(Ordering::Relaxed)
    }

    pub fn unchanged(&self) -> usize {
        self.unchanged.load(Ordering::Relaxed)
    }

    /// Fold another accumulator in (post-merge summation for parallel
    /// workers that kept private tallies).
    pub fn merge(&self, other: &UpdateStats) {
        self.added.fetch_add(other.added(), Ordering::Relaxed);
        self.removed.fetch_add(other.removed(), Ordering::Relaxed);
        self.unchanged.fetch_add(other.unchanged(), Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_and_merge() {
        let stats = UpdateStats::new();
        stats.record(&ReconcileOutcome {
            added: 2,
            removed: 1,
            unchanged: 5,
        });

        let worker = UpdateStats::new();
        worker.record(&ReconcileOutcome {
            added: 1,
            removed: 0,
            unchanged: 3,
        });
        stats.merge(&worker);

        assert_eq!(stats.added(), 3);
        assert_eq!(stats.removed(), 1);
        assert_eq!(stats.unchanged(), 8);
    }
}
