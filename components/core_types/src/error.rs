//! Error values recorded by the host context.

use thiserror::Error;

/// The kind of error signalled to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Generic `Error`
    Error,
    /// Type error (e.g. wrong argument shape)
    TypeError,
    /// Value out of allowed range
    RangeError,
    /// Internal engine error
    InternalError,
}

/// An error with its kind and a human-readable message.
///
/// # Examples
///
/// ```
/// use core_types::{ErrorKind, JsError};
///
/// let err = JsError::new(ErrorKind::TypeError, "expected bytes");
/// assert_eq!(err.to_string(), "TypeError: expected bytes");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind:?}: {message}")]
pub struct JsError {
    /// The type of error
    pub kind: ErrorKind,
    /// Human-readable error message
    pub message: String,
}

impl JsError {
    /// Create a new error
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}
