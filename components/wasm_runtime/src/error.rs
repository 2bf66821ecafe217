//! Error types for module loading, linear memory and the binary interpreter

use thiserror::Error;

/// Why a module failed to compile or instantiate
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModuleError {
    /// Fewer than 8 bytes: no room for magic and version
    #[error("module too short: {0} bytes")]
    TooShort(usize),
    /// First four bytes are not `\0asm`
    #[error("bad magic number")]
    BadMagic,
    /// Version word is not 1
    #[error("unsupported version {0}")]
    BadVersion(u32),
    /// A section declared more payload than remains
    #[error("section {id} declares {declared} bytes but only {available} remain")]
    TruncatedSection {
        /// Raw section id
        id: u8,
        /// Declared payload size
        declared: u32,
        /// Bytes left after the size field
        available: usize,
    },
    /// The section stream parsed but was rejected by validation
    #[error("module failed validation")]
    ValidationFailed,
    /// Instantiation requires a compiled module
    #[error("module is not compiled")]
    NotCompiled,
    /// Linear memory could not be created
    #[error(transparent)]
    Memory(#[from] MemoryError),
}

/// Linear memory failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryError {
    /// Initial size above the maximum
    #[error("initial size {initial} exceeds maximum {maximum} pages")]
    ExceedsMaximum {
        /// Requested pages
        initial: u32,
        /// Configured maximum
        maximum: u32,
    },
    /// The backing buffer could not be reserved
    #[error("failed to allocate {0} pages")]
    AllocationFailed(u32),
    /// Access outside the backing buffer
    #[error("access at {offset}+{len} is outside {size} bytes")]
    OutOfBounds {
        /// Start offset
        offset: usize,
        /// Access length
        len: usize,
        /// Buffer size in bytes
        size: usize,
    },
}

/// Why the binary interpreter ended a frame early
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Trap {
    /// Not enough operands on the stack
    #[error("stack underflow at offset {pc}")]
    StackUnderflow {
        /// Offset of the opcode
        pc: usize,
    },
    /// Local index past the frame's locals
    #[error("local {index} out of range ({count} locals) at offset {pc}")]
    LocalOutOfRange {
        /// Offset of the opcode
        pc: usize,
        /// Decoded index
        index: u32,
        /// Number of locals in the frame
        count: usize,
    },
    /// Operands of the wrong type for the opcode
    #[error("type mismatch for opcode {opcode:#04x} at offset {pc}")]
    TypeMismatch {
        /// Offset of the opcode
        pc: usize,
        /// Opcode byte
        opcode: u8,
    },
}
