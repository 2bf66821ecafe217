//! Bytecode instruction representation

use std::fmt;

use crate::opcode::Opcode;

/// A typed instruction argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operand {
    /// Index into the program's constant pool
    Constant(u32),
    /// Literal value encoded in the instruction
    Immediate(u32),
    /// Index into the register file
    Register(u32),
}

impl Operand {
    /// Raw operand payload regardless of kind
    pub fn value(self) -> u32 {
        match self {
            Operand::Constant(v) | Operand::Immediate(v) | Operand::Register(v) => v,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Constant(i) => write!(f, "c{}", i),
            Operand::Immediate(v) => write!(f, "#{}", v),
            Operand::Register(r) => write!(f, "r{}", r),
        }
    }
}

/// A single bytecode instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// The opcode for this instruction
    pub opcode: Opcode,
    /// Zero or more operands
    pub operands: Vec<Operand>,
    /// Source line for debugging (0 when unknown)
    pub source_line: u32,
}

impl Instruction {
    /// Create a new instruction without operands
    pub fn new(opcode: Opcode) -> Self {
        Self {
            opcode,
            operands: Vec::new(),
            source_line: 0,
        }
    }

    /// Create a new instruction with operands
    pub fn with_operands(opcode: Opcode, operands: Vec<Operand>) -> Self {
        Self {
            opcode,
            operands,
            source_line: 0,
        }
    }

    /// First operand, if any
    pub fn first_operand(&self) -> Option<Operand> {
        self.operands.first().copied()
    }
}
