//! Per-program-counter execution counters
//!
//! Counts only ever grow; there is deliberately no reset. The tiering
//! bridge reads them to decide hot-path eligibility.

use std::collections::HashMap;

/// Mapping from program counter to the number of times it was dispatched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionCounters {
    counts: HashMap<usize, u64>,
}

impl ExecutionCounters {
    /// Create empty counters
    pub fn new() -> Self {
        Self {
            counts: HashMap::new(),
        }
    }

    /// Record one dispatch at `pc`, returning the new count
    pub fn record(&mut self, pc: usize) -> u64 {
        let count = self.counts.entry(pc).or_insert(0);
        *count = count.saturating_add(1);
        *count
    }

    /// Dispatch count at `pc` (0 if never reached)
    pub fn count(&self, pc: usize) -> u64 {
        self.counts.get(&pc).copied().unwrap_or(0)
    }

    /// Number of distinct program counters that were dispatched
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether nothing has been recorded yet
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.counts.values().fold(0u64, |acc, c| acc.saturating_add(*c))
    }

    /// Number of program counters whose count reached `threshold`
    pub fn count_at_least(&self, threshold: u64) -> usize {
        self.counts.values().filter(|c| **c >= threshold).count()
    }

    /// Iterate `(pc, count)` pairs in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = (usize, u64)> + '_ {
        self.counts.iter().map(|(pc, c)| (*pc, *c))
    }
}
