//! Program - the compiled bytecode container
//!
//! Owns instructions, the constant pool, register/parameter counts, the
//! optimization level and the per-pc execution counters.

use std::fmt;

use core_types::Value;

use crate::counters::ExecutionCounters;
use crate::error::ProgramError;
use crate::instruction::{Instruction, Operand};
use crate::opcode::Opcode;

/// A compiled bytecode program
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    /// Function name for debugging
    pub name: String,
    /// Sequence of bytecode instructions
    pub instructions: Vec<Instruction>,
    /// Constant pool; append-only, indices are stable
    pub constants: Vec<Value>,
    /// Number of registers needed for execution
    pub register_count: u32,
    /// Number of leading registers seeded from call arguments
    pub parameter_count: u32,
    /// Level of the last optimization applied (0 = none)
    pub optimization_level: u32,
    /// Set once the tiering bridge has promoted this program
    pub is_optimized: bool,
    /// Execution count per program counter
    pub hot_spots: ExecutionCounters,
}

impl Program {
    /// Create a new empty program
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instructions: Vec::new(),
            constants: Vec::new(),
            register_count: 0,
            parameter_count: 0,
            optimization_level: 0,
            is_optimized: false,
            hot_spots: ExecutionCounters::new(),
        }
    }

    /// Emit an instruction without operands
    pub fn emit(&mut self, opcode: Opcode) {
        self.instructions.push(Instruction::new(opcode));
    }

    /// Emit an instruction with operands
    pub fn emit_with(&mut self, opcode: Opcode, operands: Vec<Operand>) {
        self.instructions
            .push(Instruction::with_operands(opcode, operands));
    }

    /// Append a constant and return its index.
    ///
    /// No deduplication: adding the same literal twice yields two slots.
    pub fn add_constant(&mut self, value: Value) -> u32 {
        self.constants.push(value);
        (self.constants.len() - 1) as u32
    }

    /// Get the number of instructions
    pub fn instruction_count(&self) -> usize {
        self.instructions.len()
    }

    /// Get the number of constants
    pub fn constant_count(&self) -> usize {
        self.constants.len()
    }

    /// Whether the last instruction is RETURN or HALT
    pub fn ends_with_terminator(&self) -> bool {
        self.instructions
            .last()
            .map(|inst| inst.opcode.is_terminator())
            .unwrap_or(false)
    }

    /// Check that every constant and register operand is in range
    pub fn validate(&self) -> Result<(), ProgramError> {
        for (pc, inst) in self.instructions.iter().enumerate() {
            for operand in &inst.operands {
                match *operand {
                    Operand::Constant(index) if index as usize >= self.constants.len() => {
                        return Err(ProgramError::ConstantOutOfRange {
                            pc,
                            index,
                            pool_size: self.constants.len(),
                        });
                    }
                    Operand::Register(index) if index >= self.register_count => {
                        return Err(ProgramError::RegisterOutOfRange {
                            pc,
                            index,
                            register_count: self.register_count,
                        });
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "; {} (registers={}, params={}, level={})",
            self.name, self.register_count, self.parameter_count, self.optimization_level
        )?;
        for (pc, inst) in self.instructions.iter().enumerate() {
            write!(f, "{:04} {}", pc, inst.opcode.mnemonic())?;
            for operand in &inst.operands {
                write!(f, " {}", operand)?;
            }
            if let Some(Operand::Constant(idx)) = inst.first_operand() {
                if let Some(value) = self.constants.get(idx as usize) {
                    write!(f, " ; {}", value)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
