//! Bytecode interpreter for the execution tier
//!
//! This crate provides a stack/register virtual machine with:
//! - Opcode dispatch over a closed enumeration
//! - A register file for arguments and an operand stack for expressions
//! - Per-program-counter execution counters for tier promotion
//! - Structured faults instead of silently discarded errors
//!
//! # Example
//!
//! ```
//! use bytecode_system::{Opcode, Operand, Program};
//! use core_types::Value;
//! use interpreter::BytecodeVM;
//!
//! let mut program = Program::new("answer");
//! let idx = program.add_constant(Value::Number(42.0));
//! program.emit_with(Opcode::LoadConst, vec![Operand::Constant(idx)]);
//! program.emit(Opcode::Return);
//!
//! let mut vm = BytecodeVM::new();
//! assert_eq!(vm.execute(&mut program, &[]).unwrap(), Value::Number(42.0));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod context;
pub mod dispatch;
pub mod error;
pub mod stats;
pub mod vm;

// Re-export main types at crate root
pub use context::ExecutionContext;
pub use dispatch::{Flow, CALL_PLACEHOLDER};
pub use error::{ExecutionFault, FaultKind};
pub use stats::VmStats;
pub use vm::BytecodeVM;
