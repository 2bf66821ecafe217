//! Tiering bridge: decides when a program is hot enough to promote
//!
//! Promotion is driven by breadth: several distinct program counters must
//! each be hot. One very hot instruction is not enough.

use bytecode_system::Program;
use tracing::{debug, info, warn};

/// Dispatches at a single pc before it counts as hot
pub const HOT_SPOT_THRESHOLD: u64 = 10;
/// Distinct hot pcs required for promotion
pub const MIN_HOT_SPOTS: usize = 3;
/// Optimization level recorded on promoted programs
pub const PROMOTED_LEVEL: u32 = 3;
/// Total dispatches after which a program is considered warm
pub const JIT_COMPILE_THRESHOLD: u64 = 50;

/// Profiling-driven promotion decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TieringBridge {
    threshold: u64,
}

impl TieringBridge {
    /// Bridge using [`HOT_SPOT_THRESHOLD`]
    pub fn new() -> Self {
        Self {
            threshold: HOT_SPOT_THRESHOLD,
        }
    }

    /// Bridge with a custom per-pc threshold
    pub fn with_threshold(threshold: u32) -> Self {
        Self {
            threshold: u64::from(threshold),
        }
    }

    /// Per-pc threshold in use
    pub fn threshold(&self) -> u64 {
        self.threshold
    }

    /// Number of pcs that reached the threshold
    pub fn hot_spot_count(&self, program: &Program) -> usize {
        program.hot_spots.count_at_least(self.threshold)
    }

    /// True when at least [`MIN_HOT_SPOTS`] distinct pcs are hot
    pub fn should_promote(&self, program: &Program) -> bool {
        let hot = self.hot_spot_count(program);
        debug!(program = %program.name, hot, "promotion check");
        hot >= MIN_HOT_SPOTS
    }

    /// Whether the program has executed at least [`JIT_COMPILE_THRESHOLD`] instructions
    pub fn is_warm(&self, program: &Program) -> bool {
        program.hot_spots.total() >= JIT_COMPILE_THRESHOLD
    }

    /// Mark the program optimized at [`PROMOTED_LEVEL`].
    ///
    /// Returns false, changing nothing, if it was already promoted.
    pub fn promote(&self, program: &mut Program) -> bool {
        if program.is_optimized {
            warn!(program = %program.name, "already promoted");
            return false;
        }
        program.is_optimized = true;
        program.optimization_level = PROMOTED_LEVEL;
        info!(program = %program.name, level = PROMOTED_LEVEL, "program promoted");
        true
    }
}

impl Default for TieringBridge {
    fn default() -> Self {
        Self::new()
    }
}
