//! Host context: the error-signalling collaborator.
//!
//! Operations that fail at the host boundary (module compilation,
//! instantiation) raise through the context instead of returning a
//! structured error; the caller checks [`HostContext::has_exception`].

use crate::error::{ErrorKind, JsError};

/// Execution context exposing error-signalling operations.
#[derive(Debug, Default)]
pub struct HostContext {
    exception: Option<JsError>,
}

impl HostContext {
    /// Create a context with no pending exception
    pub fn new() -> Self {
        Self { exception: None }
    }

    /// Signal a type error
    pub fn throw_type_error(&mut self, message: impl Into<String>) {
        self.raise(JsError::new(ErrorKind::TypeError, message));
    }

    /// Signal a generic error
    pub fn throw_error(&mut self, message: impl Into<String>) {
        self.raise(JsError::new(ErrorKind::Error, message));
    }

    /// Signal an already constructed error
    pub fn raise(&mut self, error: JsError) {
        // Last error wins.
        self.exception = Some(error);
    }

    /// Whether an exception is pending
    pub fn has_exception(&self) -> bool {
        self.exception.is_some()
    }

    /// The pending exception, if any
    pub fn exception(&self) -> Option<&JsError> {
        self.exception.as_ref()
    }

    /// Take and clear the pending exception
    pub fn take_exception(&mut self) -> Option<JsError> {
        self.exception.take()
    }
}
