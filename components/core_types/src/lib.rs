//! Core runtime value types shared by both execution tiers.
//!
//! The bytecode pipeline and the module-binary pipeline never call into each
//! other, but both consume the same collaborators from this crate:
//!
//! - [`Value`] - dynamic value with numeric/textual coercion and type tests
//! - [`JsObject`] / [`ObjectRef`] - named property get/set
//! - [`HostContext`] - error signalling surface (type error, generic error)
//! - [`JsError`] / [`ErrorKind`] - the errors a host context records
//!
//! # Examples
//!
//! ```
//! use core_types::{HostContext, Value};
//!
//! let v = Value::from("40");
//! assert_eq!(v.to_number() + 2.0, 42.0);
//!
//! let mut ctx = HostContext::new();
//! ctx.throw_type_error("not a module");
//! assert!(ctx.has_exception());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod context;
mod error;
mod object;
mod value;

pub use context::HostContext;
pub use error::{ErrorKind, JsError};
pub use object::{JsObject, ObjectRef};
pub use value::Value;
