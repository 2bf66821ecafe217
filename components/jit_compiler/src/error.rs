//! Native code generation errors

use std::io;

use thiserror::Error;

/// Failures while assembling or mapping native code
#[derive(Debug, Error)]
pub enum CodegenError {
    /// Generated code can only run on x86-64 unix hosts
    #[error("native code generation is not supported on this target")]
    UnsupportedTarget,
    /// Nothing to map
    #[error("cannot map an empty code buffer")]
    EmptyCode,
    /// mmap failed
    #[error("failed to allocate executable memory: {0}")]
    Allocation(#[source] io::Error),
    /// mprotect failed
    #[error("failed to switch memory to executable: {0}")]
    Protection(#[source] io::Error),
    /// Text did not name a known kernel shape
    #[error("unknown kernel shape '{0}'")]
    UnknownShape(String),
    /// A property-load kernel found a non-numeric value
    #[error("property '{0}' is not numeric")]
    PropertyNotNumeric(String),
}

/// Convenience alias
pub type CodegenResult<T> = Result<T, CodegenError>;
