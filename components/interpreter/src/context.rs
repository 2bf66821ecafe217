//! Execution context for the VM
//!
//! Two address spaces: the register file holds call arguments and locals,
//! the operand stack holds intermediate expression values.

use core_types::Value;

use crate::error::{ExecutionFault, FaultKind};

/// Per-call runtime state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionContext {
    /// Register file for arguments and locals
    pub registers: Vec<Value>,
    /// Operand stack
    pub stack: Vec<Value>,
    /// Current program counter
    pub pc: usize,
}

impl ExecutionContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self {
            registers: Vec::new(),
            stack: Vec::with_capacity(64),
            pc: 0,
        }
    }

    /// Prepare for a new call.
    ///
    /// Registers are cleared and resized to `register_count`, the first
    /// `parameter_count` are seeded from `args` and the stack is emptied.
    pub fn reset(&mut self, register_count: usize, parameter_count: usize, args: &[Value]) {
        self.registers.clear();
        self.registers.resize(register_count, Value::Undefined);
        for (slot, arg) in self
            .registers
            .iter_mut()
            .zip(args.iter())
            .take(parameter_count)
        {
            *slot = arg.clone();
        }
        self.stack.clear();
        self.pc = 0;
    }

    /// Push onto the operand stack
    pub fn push(&mut self, value: Value) {
        self.stack.push(value);
    }

    /// Pop from the operand stack
    pub fn pop(&mut self) -> Result<Value, ExecutionFault> {
        self.stack
            .pop()
            .ok_or_else(|| ExecutionFault::new(FaultKind::StackUnderflow, self.pc))
    }

    /// Read a register
    pub fn register(&self, index: usize) -> Result<Value, ExecutionFault> {
        self.registers
            .get(index)
            .cloned()
            .ok_or_else(|| ExecutionFault::new(FaultKind::RegisterOutOfRange, self.pc))
    }

    /// The value a finished frame returns: top of stack or undefined
    pub fn result(&self) -> Value {
        self.stack.last().cloned().unwrap_or(Value::Undefined)
    }
}
