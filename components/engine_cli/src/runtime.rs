//! Runtime orchestration for the CLI subcommands
//!
//! The Runtime struct owns one instance of each execution component:
//! - Lowering compiler settings and the bytecode VM
//! - Tiering bridge and native code generator
//! - Binary interpreter for raw opcode streams

use std::fmt;
use std::path::Path;

use bytecode_system::{BytecodeCompiler, Node};
use core_types::{ErrorKind, HostContext, JsError, Value};
use interpreter::{BytecodeVM, VmStats};
use jit_compiler::{CodegenError, KernelShape, NativeCodeGenerator, TieringBridge};
use tracing::{debug, info};
use wasm_runtime::{Module, Trap, WasmVM, WebAssembly};

use crate::error::{CliError, CliResult};

/// Arguments passed to the demo function on every run
const DEMO_ARGS: (f64, f64) = (8.0, 4.0);

/// Main runtime that drives the execution components for the CLI
pub struct Runtime {
    /// `None` disables the optimizer
    optimization_level: Option<u32>,
    /// Whether to print bytecode before execution
    print_bytecode: bool,
    vm: BytecodeVM,
    bridge: TieringBridge,
    codegen: NativeCodeGenerator,
    wasm: WasmVM,
}

/// Result of running a native kernel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelRun {
    /// Kernel name
    pub name: String,
    /// Machine code size in bytes
    pub code_size: usize,
    /// Value returned by the kernel
    pub result: i64,
}

/// Outcome of the bytecode demo
#[derive(Debug, Clone)]
pub struct DemoReport {
    /// Disassembly, when bytecode printing is enabled
    pub listing: Option<String>,
    /// Result of the last run
    pub result: Value,
    /// Number of runs
    pub iterations: u32,
    /// VM counters after all runs
    pub stats: VmStats,
    /// Program counters that reached the hot-spot threshold
    pub hot_spots: usize,
    /// Whether the tiering bridge promoted the program
    pub promoted: bool,
    /// Optimization level recorded on the program at the end
    pub optimization_level: u32,
    /// Native kernel result for the same arguments, if the shape was recognized
    pub native_result: Option<i64>,
}

impl fmt::Display for DemoReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(listing) = &self.listing {
            writeln!(f, "{}", listing)?;
        }
        writeln!(f, "result:       {}", self.result)?;
        writeln!(f, "runs:         {}", self.iterations)?;
        writeln!(f, "instructions: {}", self.stats.instructions_executed)?;
        writeln!(f, "hot spots:    {}", self.hot_spots)?;
        writeln!(
            f,
            "promoted:     {} (level {})",
            self.promoted, self.optimization_level
        )?;
        match self.native_result {
            Some(n) => write!(f, "native:       {}", n),
            None => write!(f, "native:       -"),
        }
    }
}

impl Runtime {
    /// Create a runtime with the compiler's default optimization level
    ///
    /// # Example
    /// ```
    /// use engine_cli::Runtime;
    ///
    /// let runtime = Runtime::new();
    /// assert_eq!(runtime.optimization_level(), Some(2));
    /// ```
    pub fn new() -> Self {
        Self {
            optimization_level: Some(BytecodeCompiler::new().optimization_level()),
            print_bytecode: false,
            vm: BytecodeVM::new(),
            bridge: TieringBridge::new(),
            codegen: NativeCodeGenerator::new(),
            wasm: WasmVM::new(),
        }
    }

    /// Set the optimization level, `None` to disable the optimizer
    pub fn with_optimization_level(mut self, level: Option<u32>) -> Self {
        self.optimization_level = level;
        self
    }

    /// Enable bytecode printing
    pub fn with_print_bytecode(mut self, enabled: bool) -> Self {
        self.print_bytecode = enabled;
        self
    }

    /// Configured optimization level
    pub fn optimization_level(&self) -> Option<u32> {
        self.optimization_level
    }

    /// Check if bytecode printing is enabled
    pub fn is_print_bytecode_enabled(&self) -> bool {
        self.print_bytecode
    }

    /// Read and compile a module binary
    ///
    /// # Errors
    /// Returns `CliError` if the file cannot be read or the module is malformed
    pub fn inspect_module(&self, path: impl AsRef<Path>) -> CliResult<Module> {
        let bytes = std::fs::read(path.as_ref())?;
        let mut module = Module::new(bytes);
        module.try_compile()?;
        Ok(module)
    }

    /// Instantiate a module binary and call an export
    ///
    /// # Errors
    /// Returns `CliError` if the module fails to instantiate or the export
    /// does not exist
    pub fn call_export(
        &mut self,
        path: impl AsRef<Path>,
        export: &str,
        args: &[f64],
    ) -> CliResult<Value> {
        let bytes = std::fs::read(path.as_ref())?;
        let mut ctx = HostContext::new();
        let mut instance =
            WebAssembly::instantiate(&mut ctx, &bytes).ok_or_else(|| host_error(&mut ctx))?;

        if instance.get_export(export).is_none() {
            return Err(CliError::UnknownExport {
                name: export.to_string(),
                available: instance.exports().collect::<Vec<_>>().join(", "),
            });
        }

        let args: Vec<Value> = args.iter().map(|&n| Value::Number(n)).collect();
        Ok(instance.call_export(export, &args))
    }

    /// Run a hex-encoded opcode stream through the binary interpreter
    ///
    /// Returns the result and the trap that ended the frame early, if any.
    ///
    /// # Example
    /// ```
    /// use core_types::Value;
    /// use engine_cli::Runtime;
    ///
    /// let mut runtime = Runtime::new();
    /// let (value, trap) = runtime.execute_hex("41 2a 0f", &[]).unwrap();
    /// assert_eq!(value, Value::Number(42.0));
    /// assert!(trap.is_none());
    /// ```
    pub fn execute_hex(&mut self, hex: &str, args: &[f64]) -> CliResult<(Value, Option<Trap>)> {
        let code = parse_hex(hex)?;
        let args: Vec<Value> = args.iter().map(|&n| Value::Number(n)).collect();
        let value = self.wasm.execute_function(&code, &args);
        Ok((value, self.wasm.last_trap()))
    }

    /// Compile a native kernel by name and call it
    ///
    /// # Errors
    /// Returns `CliError` for unknown shapes or when the host cannot run
    /// generated code
    pub fn run_kernel(&mut self, shape: &str, a: i64, b: i64) -> CliResult<KernelRun> {
        let shape: KernelShape = shape.parse()?;
        let entry = self.codegen.compile(&shape)?;
        let result = entry.call(a, b);
        debug!(kernel = entry.name(), a, b, result, "kernel returned");
        Ok(KernelRun {
            name: entry.name().to_string(),
            code_size: entry.code_size(),
            result,
        })
    }

    /// Lower the demo function, run it `iterations` times and consult the
    /// tiering bridge.
    ///
    /// The demo computes `(x + y) * 2 - x / 4`, or `x + y` when `simple`,
    /// with `x = 8` and `y = 4`.
    pub fn bytecode_demo(&mut self, iterations: u32, simple: bool) -> CliResult<DemoReport> {
        let x = || Node::identifier("x");
        let y = || Node::identifier("y");
        let body = if simple {
            Node::binary("+", x(), y())
        } else {
            Node::binary(
                "-",
                Node::binary("*", Node::binary("+", x(), y()), Node::number(2.0)),
                Node::binary("/", x(), Node::number(4.0)),
            )
        };

        let mut compiler = BytecodeCompiler::new();
        match self.optimization_level {
            Some(level) => compiler.set_optimization_level(level),
            None => compiler.set_optimization_enabled(false),
        }
        let mut program = compiler.compile_function(Some(&body), "demo", &["x", "y"])?;
        let listing = self.print_bytecode.then(|| program.to_string());

        let args = [Value::Number(DEMO_ARGS.0), Value::Number(DEMO_ARGS.1)];
        self.vm.reset_stats();
        let mut result = Value::Undefined;
        for _ in 0..iterations {
            result = self.vm.execute(&mut program, &args)?;
        }

        let hot_spots = self.bridge.hot_spot_count(&program);
        let promoted = self.bridge.should_promote(&program) && self.bridge.promote(&mut program);
        if promoted {
            info!(program = %program.name, hot_spots, "demo promoted");
        }

        let native_result = match KernelShape::recognize(&program) {
            Some(shape) => match self.codegen.compile(&shape) {
                Ok(entry) => Some(entry.call(DEMO_ARGS.0 as i64, DEMO_ARGS.1 as i64)),
                Err(CodegenError::UnsupportedTarget) => None,
                Err(err) => return Err(err.into()),
            },
            None => None,
        };

        Ok(DemoReport {
            listing,
            result,
            iterations,
            stats: self.vm.stats(),
            hot_spots,
            promoted,
            optimization_level: program.optimization_level,
            native_result,
        })
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode a hex string such as `"41 2a 0f"` or `"0x412a0f"`
///
/// # Example
/// ```
/// use engine_cli::parse_hex;
///
/// assert_eq!(parse_hex("41 2A 0f").unwrap(), vec![0x41, 0x2A, 0x0F]);
/// assert!(parse_hex("4").is_err());
/// ```
pub fn parse_hex(input: &str) -> CliResult<Vec<u8>> {
    let digits: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    let digits = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
        .unwrap_or(&digits);

    if digits.len() % 2 != 0 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(CliError::InvalidHex(input.to_string()));
    }

    (0..digits.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| CliError::InvalidHex(input.to_string()))
        })
        .collect()
}

fn host_error(ctx: &mut HostContext) -> CliError {
    ctx.take_exception()
        .unwrap_or_else(|| JsError::new(ErrorKind::InternalError, "host call failed"))
        .into()
}
