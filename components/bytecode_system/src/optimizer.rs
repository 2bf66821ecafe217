//! Bytecode optimization passes
//!
//! Level 0 leaves the program untouched. Levels 1 and 2 remove NOP
//! instructions. Level 3 and above additionally drops instructions that
//! follow the first RETURN or HALT, which the interpreter never dispatches.

use tracing::trace;

use crate::opcode::Opcode;
use crate::program::Program;

/// Bytecode optimizer parameterised by level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Optimizer {
    level: u32,
}

impl Optimizer {
    /// Create an optimizer at the default level (2)
    pub fn new() -> Self {
        Self { level: 2 }
    }

    /// Create an optimizer at a specific level
    pub fn with_level(level: u32) -> Self {
        Self { level }
    }

    /// Configured level
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Run all passes enabled for this level and record the level on the program.
    ///
    /// Does not touch `is_optimized`; that flag belongs to tier promotion.
    pub fn optimize(&self, program: &mut Program) {
        if self.level == 0 {
            return;
        }

        let removed = self.remove_nops(program);
        let dead = if self.level >= 3 {
            self.eliminate_dead_code(program)
        } else {
            0
        };

        program.optimization_level = self.level;
        trace!(
            program = %program.name,
            level = self.level,
            nops_removed = removed,
            dead_removed = dead,
            "optimized program"
        );
    }

    /// Remove every NOP, preserving the order of everything else
    fn remove_nops(&self, program: &mut Program) -> usize {
        let before = program.instructions.len();
        program
            .instructions
            .retain(|inst| inst.opcode != Opcode::Nop);
        before - program.instructions.len()
    }

    /// Truncate after the first terminator
    fn eliminate_dead_code(&self, program: &mut Program) -> usize {
        let cut = program
            .instructions
            .iter()
            .position(|inst| inst.opcode.is_terminator());
        match cut {
            Some(pc) if pc + 1 < program.instructions.len() => {
                let removed = program.instructions.len() - (pc + 1);
                program.instructions.truncate(pc + 1);
                removed
            }
            _ => 0,
        }
    }
}

impl Default for Optimizer {
    fn default() -> Self {
        Self::new()
    }
}
