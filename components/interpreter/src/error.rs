//! Execution faults raised by the dispatch loop

use thiserror::Error;

/// Why an instruction could not execute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// An instruction popped more values than the stack held
    StackUnderflow,
    /// A constant operand indexed past the pool
    ConstantOutOfRange,
    /// A register operand indexed past the register file
    RegisterOutOfRange,
    /// The instruction carried no operand where one is required
    MissingOperand,
    /// The operand had the wrong kind (e.g. immediate instead of constant)
    OperandKindMismatch,
}

/// A fault together with the program counter that raised it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{kind:?} at pc {pc}")]
pub struct ExecutionFault {
    /// Fault category
    pub kind: FaultKind,
    /// Program counter of the faulting instruction
    pub pc: usize,
}

impl ExecutionFault {
    /// Create a fault
    pub fn new(kind: FaultKind, pc: usize) -> Self {
        Self { kind, pc }
    }
}
