//! Quanta execution-tier CLI library
//!
//! Provides the Runtime struct and supporting modules for the `quanta` binary.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cli;
pub mod error;
pub mod runtime;

pub use cli::{Cli, Command};
pub use error::{CliError, CliResult};
pub use runtime::{parse_hex, DemoReport, KernelRun, Runtime};
