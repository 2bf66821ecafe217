//! Integration test suite for the Quanta execution tier
//!
//! This crate provides integration tests that verify components work
//! together correctly across component boundaries.

/// Re-export components for test convenience
pub mod components {
    pub use bytecode_system;
    pub use core_types;
    pub use engine_cli;
    pub use interpreter;
    pub use jit_compiler;
    pub use wasm_runtime;
}
