//! Errors produced while building or checking programs

use thiserror::Error;

/// A violation of the program operand invariant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgramError {
    /// A constant operand points past the end of the pool
    #[error("instruction {pc}: constant index {index} out of range (pool size {pool_size})")]
    ConstantOutOfRange {
        /// Offending program counter
        pc: usize,
        /// Referenced constant index
        index: u32,
        /// Size of the constant pool
        pool_size: usize,
    },
    /// A register operand is not below the declared register count
    #[error("instruction {pc}: register {index} out of range (register count {register_count})")]
    RegisterOutOfRange {
        /// Offending program counter
        pc: usize,
        /// Referenced register
        index: u32,
        /// Declared register count
        register_count: u32,
    },
}

/// Lowering failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// No syntax tree was supplied
    #[error("cannot compile '{0}': no syntax tree")]
    MissingRoot(String),
}
