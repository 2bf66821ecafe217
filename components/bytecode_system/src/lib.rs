//! Bytecode system for the execution tier
//!
//! This crate provides the instruction set, the program container, and the
//! lowering compiler that turns a syntax tree into a linear program.
//!
//! # Features
//!
//! - Stack machine opcodes with typed operands (constant, immediate, register)
//! - Append-only constant pool with stable indices
//! - Per-program-counter execution counters consumed by the tiering bridge
//! - NOP removal and dead code elimination passes
//!
//! # Example
//!
//! ```
//! use bytecode_system::{BytecodeCompiler, Node, Opcode};
//!
//! let ast = Node::binary("+", Node::number(1.0), Node::number(2.0));
//!
//! let mut compiler = BytecodeCompiler::new();
//! let program = compiler.compile(Some(&ast), "sum").unwrap();
//!
//! assert_eq!(program.instructions.last().unwrap().opcode, Opcode::Return);
//! assert_eq!(program.constant_count(), 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ast;
pub mod compiler;
pub mod counters;
pub mod error;
pub mod instruction;
pub mod opcode;
pub mod optimizer;
pub mod program;

// Re-export main types at crate root
pub use ast::{Node, NodeKind, SyntaxNode};
pub use compiler::BytecodeCompiler;
pub use counters::ExecutionCounters;
pub use error::{CompileError, ProgramError};
pub use instruction::{Instruction, Operand};
pub use opcode::Opcode;
pub use optimizer::Optimizer;
pub use program::Program;
