//! Virtual Machine for bytecode execution
//!
//! Main entry point for executing compiled programs.

use bytecode_system::Program;
use core_types::{HostContext, Value};
use tracing::{debug, warn};

use crate::context::ExecutionContext;
use crate::dispatch::{dispatch, Flow};
use crate::error::ExecutionFault;
use crate::stats::VmStats;

/// Stack/register virtual machine
///
/// The VM keeps one [`ExecutionContext`] that is reset on every call, plus
/// counters that accumulate across calls.
#[derive(Debug)]
pub struct BytecodeVM {
    context: ExecutionContext,
    profiling_enabled: bool,
    stats: VmStats,
}

impl BytecodeVM {
    /// Create a new VM with profiling enabled
    pub fn new() -> Self {
        Self {
            context: ExecutionContext::new(),
            profiling_enabled: true,
            stats: VmStats::new(),
        }
    }

    /// Toggle per-pc hot-spot recording
    pub fn enable_profiling(&mut self, enabled: bool) {
        self.profiling_enabled = enabled;
    }

    /// Whether hot-spot recording is on
    pub fn is_profiling(&self) -> bool {
        self.profiling_enabled
    }

    /// Execute `program` with positional `args`
    ///
    /// Registers, operand stack and pc live in the VM's own
    /// [`ExecutionContext`]. Use [`BytecodeVM::execute_in`] to run against a
    /// caller's [`HostContext`].
    ///
    /// # Returns
    ///
    /// * `Ok(Value)` - top of the operand stack, or undefined if it is empty
    /// * `Err(ExecutionFault)` - the first fault, with its program counter
    ///
    /// # Example
    ///
    /// ```
    /// use bytecode_system::{BytecodeCompiler, Node};
    /// use core_types::Value;
    /// use interpreter::BytecodeVM;
    ///
    /// let ast = Node::binary("+", Node::identifier("x"), Node::number(1.0));
    /// let mut program = BytecodeCompiler::new()
    ///     .compile_function(Some(&ast), "inc", &["x"])
    ///     .unwrap();
    ///
    /// let mut vm = BytecodeVM::new();
    /// let result = vm.execute(&mut program, &[Value::Number(41.0)]).unwrap();
    /// assert_eq!(result, Value::Number(42.0));
    /// ```
    pub fn execute(&mut self, program: &mut Program, args: &[Value]) -> Result<Value, ExecutionFault> {
        self.context.reset(
            program.register_count as usize,
            program.parameter_count as usize,
            args,
        );
        if program.is_optimized {
            self.stats.optimized_paths_taken += 1;
        }

        while self.context.pc < program.instructions.len() {
            let pc = self.context.pc;
            self.stats.instructions_executed += 1;
            if self.profiling_enabled {
                program.hot_spots.record(pc);
            }

            let flow = dispatch(
                &program.instructions[pc],
                &program.constants,
                &mut self.context,
                &mut self.stats,
            )?;
            if flow == Flow::Stop {
                break;
            }
            self.context.pc += 1;
        }

        let result = self.context.result();
        debug!(program = %program.name, pc = self.context.pc, result = %result, "execution finished");
        Ok(result)
    }

    /// Execute and collapse any fault into undefined
    pub fn execute_or_undefined(&mut self, program: &mut Program, args: &[Value]) -> Value {
        match self.execute(program, args) {
            Ok(value) => value,
            Err(fault) => {
                warn!(program = %program.name, %fault, "execution fault discarded");
                Value::Undefined
            }
        }
    }

    /// Execute against a host context
    ///
    /// A fault is raised on `host` as an error and the result is undefined.
    pub fn execute_in(&mut self, host: &mut HostContext, program: &mut Program, args: &[Value]) -> Value {
        match self.execute(program, args) {
            Ok(value) => value,
            Err(fault) => {
                warn!(program = %program.name, %fault, "execution fault raised on host");
                host.throw_error(fault.to_string());
                Value::Undefined
            }
        }
    }

    /// Accumulated counters
    pub fn stats(&self) -> VmStats {
        self.stats
    }

    /// Zero the accumulated counters
    pub fn reset_stats(&mut self) {
        self.stats = VmStats::new();
    }

    /// Register file as left by the last call
    pub fn registers(&self) -> &[Value] {
        &self.context.registers
    }

    /// Operand stack depth as left by the last call
    pub fn stack_depth(&self) -> usize {
        self.context.stack.len()
    }
}

impl Default for BytecodeVM {
    fn default() -> Self {
        Self::new()
    }
}
