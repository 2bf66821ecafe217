//! Command line arguments

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Quanta execution tier: bytecode, native kernels and module binaries
#[derive(Debug, Parser)]
#[command(name = "quanta", version)]
pub struct Cli {
    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// What to run
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Subcommands
#[derive(Debug, Subcommand, PartialEq)]
pub enum Command {
    /// Load and compile a module binary, then list its sections
    WasmInspect {
        /// Module file
        file: PathBuf,
    },

    /// Instantiate a module binary and call one of its exports
    WasmCall {
        /// Module file
        file: PathBuf,
        /// Export name
        export: String,
        /// Numeric arguments
        #[arg(allow_negative_numbers = true)]
        args: Vec<f64>,
    },

    /// Run a raw opcode stream through the binary interpreter
    WasmExec {
        /// Opcode bytes as hex, e.g. "41 2a 0f"
        hex: String,
        /// Numeric arguments
        #[arg(allow_negative_numbers = true)]
        args: Vec<f64>,
    },

    /// Compile a native kernel and call it
    Kernel {
        /// add, sub, mul, loop-add, loop-sub, loop-mul or const:<n>
        shape: String,
        /// First argument
        #[arg(default_value_t = 0, allow_negative_numbers = true)]
        a: i64,
        /// Second argument
        #[arg(default_value_t = 0, allow_negative_numbers = true)]
        b: i64,
    },

    /// Lower a built-in function, run it repeatedly and report tiering
    BytecodeDemo {
        /// Optimization level for the lowering compiler
        #[arg(long, default_value_t = 2)]
        opt_level: u32,
        /// Disable the optimizer
        #[arg(long)]
        no_opt: bool,
        /// Print the disassembled program
        #[arg(long)]
        print_bytecode: bool,
        /// Number of runs
        #[arg(long, default_value_t = 12)]
        iterations: u32,
        /// Use `x + y`, a shape the native generator recognizes
        #[arg(long)]
        simple: bool,
    },
}
