//! Tiering and native code generation for the execution tier
//!
//! This crate provides:
//! - Tiering bridge: decides when an interpreted program is hot enough to promote
//! - Assembler: a small x86-64 encoder
//! - Executable regions: W^X memory holding generated code
//! - Native code generator: fixed-shape numeric kernels callable from Rust
//! - Code registry: per-function cache of compiled entries
//!
//! Promotion and native execution are independent: promoting a program only
//! marks it optimized, it does not redirect execution to generated code.
//!
//! # Example
//!
//! ```
//! use jit_compiler::{ArithOp, KernelShape, NativeCodeGenerator, TieringBridge};
//! use bytecode_system::Program;
//!
//! let mut program = Program::new("hot");
//! for pc in 0..3 {
//!     for _ in 0..10 {
//!         program.hot_spots.record(pc);
//!     }
//! }
//! let bridge = TieringBridge::new();
//! assert!(bridge.should_promote(&program));
//! assert!(bridge.promote(&mut program));
//!
//! let generator = NativeCodeGenerator::new();
//! let code = generator.assemble(&KernelShape::Arithmetic(ArithOp::Add)).unwrap();
//! assert_eq!(code[0], 0x55);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod assembler;
pub mod codegen;
pub mod error;
pub mod exec_memory;
pub mod registry;
pub mod tiering;

// Re-export main types at crate root
pub use assembler::{Assembler, Reg};
pub use codegen::{ArithOp, CompiledEntry, KernelFn, KernelShape, NativeCodeGenerator};
pub use error::{CodegenError, CodegenResult};
pub use exec_memory::ExecutableRegion;
pub use registry::{CodeRegistry, FunctionId};
pub use tiering::{
    TieringBridge, HOT_SPOT_THRESHOLD, JIT_COMPILE_THRESHOLD, MIN_HOT_SPOTS, PROMOTED_LEVEL,
};
