//! Global VM counters

/// Counters accumulated across every program a VM executes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VmStats {
    /// Instructions dispatched, including the terminating one
    pub instructions_executed: u64,
    /// CALL instructions dispatched
    pub function_calls: u64,
    /// Executions of programs already promoted by the tiering bridge
    pub optimized_paths_taken: u64,
}

impl VmStats {
    /// Zeroed counters
    pub fn new() -> Self {
        Self::default()
    }
}
