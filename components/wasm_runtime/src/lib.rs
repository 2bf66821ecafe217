//! Module-binary runtime
//!
//! A second, independent execution path for WebAssembly-style binaries:
//! - LEB128 variable-length integer decoding
//! - Module loading (preamble check and section splitting)
//! - Page-counted linear memory
//! - A stack-machine interpreter for function bodies
//! - Instances exposing a fixed export table
//! - The `WebAssembly` compile/validate/instantiate namespace
//!
//! This crate never calls into the bytecode interpreter; the two instruction
//! sets are unrelated.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use core_types::Value;
//! use wasm_runtime::{Instance, Module};
//!
//! let mut module = Module::new(vec![0x00, 0x61, 0x73, 0x6D, 0x01, 0x00, 0x00, 0x00]);
//! assert!(module.compile());
//! assert!(module.sections().is_empty());
//!
//! let mut instance = Instance::new(Arc::new(module));
//! assert!(instance.instantiate());
//! let product = instance.call_export("multiply", &[Value::Number(3.0), Value::Number(4.0)]);
//! assert_eq!(product, Value::Number(12.0));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod api;
pub mod error;
pub mod instance;
pub mod leb128;
pub mod memory;
pub mod module;
pub mod vm;

// Re-export main types at crate root
pub use api::WebAssembly;
pub use error::{MemoryError, ModuleError, Trap};
pub use instance::{ExportedFunction, Instance, FIXED_EXPORTS};
pub use memory::{Memory, MAX_PAGES, PAGE_SIZE};
pub use module::{Module, Section, SectionId};
pub use vm::{ExecutionFrame, WasmOpcode, WasmValue, WasmVM};
