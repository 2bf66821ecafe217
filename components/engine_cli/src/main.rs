//! Quanta execution-tier CLI
//!
//! Entry point for the `quanta` binary. Parses CLI arguments, installs the
//! log subscriber and delegates to the Runtime.

use clap::Parser as ClapParser;
use core_types::Value;
use engine_cli::{Cli, CliError, CliResult, Command, Runtime};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let Some(command) = cli.command else {
        print_usage();
        return;
    };

    if let Err(err) = run(command) {
        match err {
            CliError::IoError(e) => eprintln!("Error: could not read input: {}", e),
            CliError::HostError(e) => eprintln!("Host Error: {}", e),
            e => eprintln!("Error: {}", e),
        }
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: Command) -> CliResult<()> {
    match command {
        Command::WasmInspect { file } => {
            let module = Runtime::new().inspect_module(&file)?;
            println!("{}: {} bytes, {} sections", file.display(), module.bytes().len(), module.sections().len());
            for (i, section) in module.sections().iter().enumerate() {
                println!("  [{}] {:<10} {:>6} bytes", i, section.id.to_string(), section.size());
            }
        }
        Command::WasmCall { file, export, args } => {
            let result = Runtime::new().call_export(&file, &export, &args)?;
            print_value(&result);
        }
        Command::WasmExec { hex, args } => {
            let (result, trap) = Runtime::new().execute_hex(&hex, &args)?;
            print_value(&result);
            if let Some(trap) = trap {
                eprintln!("trap: {}", trap);
            }
        }
        Command::Kernel { shape, a, b } => {
            let run = Runtime::new().run_kernel(&shape, a, b)?;
            println!("{}({}, {}) = {}  [{} bytes]", run.name, a, b, run.result, run.code_size);
        }
        Command::BytecodeDemo {
            opt_level,
            no_opt,
            print_bytecode,
            iterations,
            simple,
        } => {
            let level = (!no_opt).then_some(opt_level);
            let report = Runtime::new()
                .with_optimization_level(level)
                .with_print_bytecode(print_bytecode)
                .bytecode_demo(iterations, simple)?;
            println!("{}", report);
        }
    }
    Ok(())
}

fn print_value(value: &Value) {
    println!("{}", value);
}

fn print_usage() {
    println!("Quanta execution tier v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Usage:");
    println!("  quanta wasm-inspect <FILE>                 List module sections");
    println!("  quanta wasm-call <FILE> <EXPORT> [ARGS]    Call an instance export");
    println!("  quanta wasm-exec <HEX> [ARGS]              Run raw opcode bytes");
    println!("  quanta kernel <SHAPE> [A] [B]              Compile and call a native kernel");
    println!("  quanta bytecode-demo                       Run the tiering demo");
    println!();
    println!("Run 'quanta --help' for more options.");
}
