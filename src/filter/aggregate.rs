//! Shared, append-only collection of match records.
//!
//! Workers merge their local keep-lists here; the dispatcher polls the match
//! count for the early-stop predicate. The count is an atomic updated inside
//! the same critical section as the append, so a dispatcher-side read can
//! never observe a count the vector does not yet reflect.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Lock-protected result collection with a lock-free size query.
#[derive(Debug, Default)]
pub struct ResultAggregator {
    matches: Mutex<Vec<String>>,
    count: AtomicUsize,
}

impl ResultAggregator {
    /// Create an empty aggregator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a worker's keep-list under the lock.
    ///
    /// Records are drained out of `keep` so its backing storage can go back
    /// to the buffer pool.
    pub fn append(&self, keep: &mut Vec<String>) {
        if keep.is_empty() {
            return;
        }
        let mut matches = self.matches.lock().expect("result lock poisoned");
        matches.append(keep);
        self.count.store(matches.len(), Ordering::Release);
    }

    /// Number of records appended so far.
    ///
    /// Safe to call from the dispatch loop without taking the append lock.
    pub fn len(&self) -> usize {
        self.count.load(Ordering::Acquire)
    }

    /// True when nothing has been appended.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Consume the aggregator and return the collected records.
    ///
    /// Call only after the completion barrier: record order reflects worker
    /// scheduling, contents do not.
    pub fn into_matches(self) -> Vec<String> {
        self.matches
            .into_inner()
            .expect("result lock poisoned")
    }
}

/// Early-stop predicate for the dispatch loop.
///
/// Assumes a fixed match multiplicity per accession (two rows each in the
/// free-form file, one in the fixed-column file). The assumption is a
/// throughput heuristic: it can stop a run before later true matches, and a
/// run where some accessions never match simply scans to end of file.
#[derive(Debug, Clone, Copy)]
pub struct EarlyStop {
    threshold: usize,
}

impl EarlyStop {
    /// Build the predicate from an expected multiplicity and accession count.
    pub fn new(multiplicity: usize, accession_count: usize) -> Self {
        EarlyStop {
            threshold: multiplicity * accession_count,
        }
    }

    /// Match count at which dispatch stops.
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// True once enough matches have been recorded.
    ///
    /// `>=` rather than `==`: concurrent appends land in whole batches, so an
    /// exact-equality check could be stepped over and never fire.
    pub fn is_satisfied(&self, matched: usize) -> bool {
        matched >= self.threshold
    }
}
