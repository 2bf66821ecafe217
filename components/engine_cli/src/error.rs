//! Error types for the CLI

use bytecode_system::CompileError;
use core_types::JsError;
use interpreter::ExecutionFault;
use jit_compiler::CodegenError;
use thiserror::Error;
use wasm_runtime::ModuleError;

/// CLI-specific errors
#[derive(Debug, Error)]
pub enum CliError {
    /// File I/O error
    #[error("File error: {0}")]
    IoError(#[from] std::io::Error),

    /// Module binary rejected
    #[error("Module error: {0}")]
    ModuleError(#[from] ModuleError),

    /// Error signalled through the host context
    #[error("{0}")]
    HostError(#[from] JsError),

    /// Lowering failed
    #[error("Compile error: {0}")]
    CompileError(#[from] CompileError),

    /// Bytecode execution fault
    #[error("Execution fault: {0}")]
    ExecutionError(#[from] ExecutionFault),

    /// Native code generation failed
    #[error("Codegen error: {0}")]
    CodegenError(#[from] CodegenError),

    /// Opcode stream argument is not hex
    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    /// Export name not in the instance's table
    #[error("Unknown export '{name}' (available: {available})")]
    UnknownExport {
        /// Requested name
        name: String,
        /// Comma-separated export names
        available: String,
    },
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
