//! Dispatch loop for bytecode execution
//!
//! Handles individual opcode execution. Each handler either continues,
//! ends the frame, or raises an [`ExecutionFault`].

use bytecode_system::{Instruction, Opcode, Operand};
use core_types::Value;
use tracing::trace;

use crate::context::ExecutionContext;
use crate::error::{ExecutionFault, FaultKind};
use crate::stats::VmStats;

/// Result pushed by CALL until real invocation exists
pub const CALL_PLACEHOLDER: f64 = 42.0;

/// What the loop does after an instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Advance to the next instruction
    Continue,
    /// End the frame
    Stop,
}

/// Execute one instruction against `ctx`
pub fn dispatch(
    inst: &Instruction,
    constants: &[Value],
    ctx: &mut ExecutionContext,
    stats: &mut VmStats,
) -> Result<Flow, ExecutionFault> {
    trace!(pc = ctx.pc, opcode = inst.opcode.mnemonic(), depth = ctx.stack.len(), "dispatch");

    match inst.opcode {
        Opcode::LoadConst => {
            let index = constant_operand(inst, ctx.pc)?;
            let value = constants
                .get(index)
                .cloned()
                .ok_or_else(|| ExecutionFault::new(FaultKind::ConstantOutOfRange, ctx.pc))?;
            ctx.push(value);
        }
        Opcode::LoadVar => {
            let index = register_operand(inst, ctx.pc)?;
            let value = ctx.register(index)?;
            ctx.push(value);
        }
        Opcode::Add => {
            let b = ctx.pop()?;
            let a = ctx.pop()?;
            ctx.push(add(a, b));
        }
        Opcode::Sub => {
            let b = ctx.pop()?;
            let a = ctx.pop()?;
            ctx.push(Value::Number(a.to_number() - b.to_number()));
        }
        Opcode::Mul => {
            let b = ctx.pop()?;
            let a = ctx.pop()?;
            ctx.push(Value::Number(a.to_number() * b.to_number()));
        }
        Opcode::Div => {
            let b = ctx.pop()?;
            let a = ctx.pop()?;
            ctx.push(Value::Number(a.to_number() / b.to_number()));
        }
        Opcode::Call => {
            stats.function_calls += 1;
            ctx.push(Value::Number(CALL_PLACEHOLDER));
        }
        Opcode::Return | Opcode::Halt => return Ok(Flow::Stop),
        Opcode::Nop => {}
    }

    Ok(Flow::Continue)
}

/// Numeric addition when both sides are numbers, string concatenation otherwise
fn add(a: Value, b: Value) -> Value {
    match (&a, &b) {
        (Value::Number(x), Value::Number(y)) => Value::Number(x + y),
        _ => Value::String(format!("{}{}", a.to_display_string(), b.to_display_string())),
    }
}

fn constant_operand(inst: &Instruction, pc: usize) -> Result<usize, ExecutionFault> {
    match inst.first_operand() {
        Some(Operand::Constant(index)) => Ok(index as usize),
        Some(_) => Err(ExecutionFault::new(FaultKind::OperandKindMismatch, pc)),
        None => Err(ExecutionFault::new(FaultKind::MissingOperand, pc)),
    }
}

fn register_operand(inst: &Instruction, pc: usize) -> Result<usize, ExecutionFault> {
    match inst.first_operand() {
        Some(Operand::Register(index)) => Ok(index as usize),
        Some(_) => Err(ExecutionFault::new(FaultKind::OperandKindMismatch, pc)),
        None => Err(ExecutionFault::new(FaultKind::MissingOperand, pc)),
    }
}
