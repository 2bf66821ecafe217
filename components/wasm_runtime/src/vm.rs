//! Binary interpreter for module function bodies
//!
//! A small stack machine over raw opcode bytes. Each call pushes one
//! [`ExecutionFrame`] (cursor, locals, operand stack) onto an explicit call
//! stack and runs it until the bytes run out or a `return`/`end` opcode is
//! reached. The frame's result is the top of its operand stack, or zero.
//!
//! Unknown opcodes are skipped as one-byte no-ops. A failing instruction
//! (stack underflow, bad local index, operand type mismatch) ends the frame
//! early and is recorded as a [`Trap`].

use core_types::Value;
use tracing::{debug, trace};

use crate::error::Trap;
use crate::leb128;

/// Opcodes understood by [`WasmVM`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum WasmOpcode {
    /// Do nothing
    Nop = 0x01,
    /// End of block or function
    End = 0x0B,
    /// Leave the function
    Return = 0x0F,
    /// Push a local (`uvarint` index)
    LocalGet = 0x20,
    /// Pop into a local (`uvarint` index)
    LocalSet = 0x21,
    /// Push a constant (`svarint` value)
    I32Const = 0x41,
    /// i32 addition
    I32Add = 0x6A,
    /// i32 subtraction
    I32Sub = 0x6B,
    /// i32 multiplication
    I32Mul = 0x6C,
    /// f32 addition
    F32Add = 0x92,
    /// f64 addition
    F64Add = 0xA0,
}

impl WasmOpcode {
    /// Decode an opcode byte, `None` if unsupported
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x01 => Some(WasmOpcode::Nop),
            0x0B => Some(WasmOpcode::End),
            0x0F => Some(WasmOpcode::Return),
            0x20 => Some(WasmOpcode::LocalGet),
            0x21 => Some(WasmOpcode::LocalSet),
            0x41 => Some(WasmOpcode::I32Const),
            0x6A => Some(WasmOpcode::I32Add),
            0x6B => Some(WasmOpcode::I32Sub),
            0x6C => Some(WasmOpcode::I32Mul),
            0x92 => Some(WasmOpcode::F32Add),
            0xA0 => Some(WasmOpcode::F64Add),
            _ => None,
        }
    }

    /// The opcode byte
    pub fn as_byte(self) -> u8 {
        self as u8
    }
}

/// A typed operand
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WasmValue {
    /// 32-bit integer
    I32(i32),
    /// 64-bit integer
    I64(i64),
    /// 32-bit float
    F32(f32),
    /// 64-bit float
    F64(f64),
}

impl Default for WasmValue {
    fn default() -> Self {
        WasmValue::I32(0)
    }
}

impl WasmValue {
    /// Convert a host argument: numeric coercion, then truncation to i32
    ///
    /// # Examples
    ///
    /// ```
    /// use core_types::Value;
    /// use wasm_runtime::WasmValue;
    ///
    /// assert_eq!(WasmValue::from_host(&Value::Number(3.9)), WasmValue::I32(3));
    /// assert_eq!(WasmValue::from_host(&Value::from("x")), WasmValue::I32(0));
    /// ```
    pub fn from_host(value: &Value) -> Self {
        // `as` saturates out-of-range values and maps NaN to 0
        WasmValue::I32(value.to_number() as i32)
    }

    /// Numeric content as a double
    pub fn as_f64(self) -> f64 {
        match self {
            WasmValue::I32(v) => f64::from(v),
            WasmValue::I64(v) => v as f64,
            WasmValue::F32(v) => f64::from(v),
            WasmValue::F64(v) => v,
        }
    }

    /// Value type name (`i32`, `i64`, `f32`, `f64`)
    pub fn type_name(self) -> &'static str {
        match self {
            WasmValue::I32(_) => "i32",
            WasmValue::I64(_) => "i64",
            WasmValue::F32(_) => "f32",
            WasmValue::F64(_) => "f64",
        }
    }
}

/// One function activation
#[derive(Debug, Clone)]
pub struct ExecutionFrame {
    code: Vec<u8>,
    pc: usize,
    end: usize,
    locals: Vec<WasmValue>,
    stack: Vec<WasmValue>,
}

enum Step {
    Continue,
    Exit,
}

impl ExecutionFrame {
    /// Frame at the start of `code` with the given locals
    pub fn new(code: &[u8], locals: Vec<WasmValue>) -> Self {
        Self {
            code: code.to_vec(),
            pc: 0,
            end: code.len(),
            locals,
            stack: Vec::new(),
        }
    }

    /// Offset of the next opcode
    pub fn pc(&self) -> usize {
        self.pc
    }

    /// Local variables
    pub fn locals(&self) -> &[WasmValue] {
        &self.locals
    }

    /// Operand stack, bottom first
    pub fn stack(&self) -> &[WasmValue] {
        &self.stack
    }

    fn is_finished(&self) -> bool {
        self.pc >= self.end
    }

    fn result(&self) -> WasmValue {
        self.stack.last().copied().unwrap_or_default()
    }

    fn step(&mut self) -> Result<Step, Trap> {
        let pc = self.pc;
        let byte = self.code[pc];
        self.pc += 1;

        let Some(opcode) = WasmOpcode::from_byte(byte) else {
            trace!(pc, opcode = byte, "skipping unsupported opcode");
            return Ok(Step::Continue);
        };
        trace!(pc, ?opcode, depth = self.stack.len(), "dispatch");

        match opcode {
            WasmOpcode::Nop => {}
            WasmOpcode::End | WasmOpcode::Return => return Ok(Step::Exit),
            WasmOpcode::I32Const => {
                let value = leb128::read_i32(&self.code[..self.end], &mut self.pc);
                self.stack.push(WasmValue::I32(value));
            }
            WasmOpcode::LocalGet => {
                let index = leb128::read_u32(&self.code[..self.end], &mut self.pc);
                let value = *self.local(pc, index)?;
                self.stack.push(value);
            }
            WasmOpcode::LocalSet => {
                let index = leb128::read_u32(&self.code[..self.end], &mut self.pc);
                self.local(pc, index)?;
                let value = self.stack.pop().ok_or(Trap::StackUnderflow { pc })?;
                self.locals[index as usize] = value;
            }
            WasmOpcode::I32Add => self.binary(pc, byte, |a, b| match (a, b) {
                (WasmValue::I32(a), WasmValue::I32(b)) => Some(WasmValue::I32(a.wrapping_add(b))),
                _ => None,
            })?,
            WasmOpcode::I32Sub => self.binary(pc, byte, |a, b| match (a, b) {
                (WasmValue::I32(a), WasmValue::I32(b)) => Some(WasmValue::I32(a.wrapping_sub(b))),
                _ => None,
            })?,
            WasmOpcode::I32Mul => self.binary(pc, byte, |a, b| match (a, b) {
                (WasmValue::I32(a), WasmValue::I32(b)) => Some(WasmValue::I32(a.wrapping_mul(b))),
                _ => None,
            })?,
            WasmOpcode::F32Add => self.binary(pc, byte, |a, b| match (a, b) {
                (WasmValue::F32(a), WasmValue::F32(b)) => Some(WasmValue::F32(a + b)),
                _ => None,
            })?,
            WasmOpcode::F64Add => self.binary(pc, byte, |a, b| match (a, b) {
                (WasmValue::F64(a), WasmValue::F64(b)) => Some(WasmValue::F64(a + b)),
                _ => None,
            })?,
        }

        Ok(Step::Continue)
    }

    fn local(&self, pc: usize, index: u32) -> Result<&WasmValue, Trap> {
        self.locals.get(index as usize).ok_or(Trap::LocalOutOfRange {
            pc,
            index,
            count: self.locals.len(),
        })
    }

    // Operands are only consumed when the operation succeeds.
    fn binary(
        &mut self,
        pc: usize,
        opcode: u8,
        op: impl Fn(WasmValue, WasmValue) -> Option<WasmValue>,
    ) -> Result<(), Trap> {
        let len = self.stack.len();
        if len < 2 {
            return Err(Trap::StackUnderflow { pc });
        }
        let result = op(self.stack[len - 2], self.stack[len - 1])
            .ok_or(Trap::TypeMismatch { pc, opcode })?;
        self.stack.truncate(len - 2);
        self.stack.push(result);
        Ok(())
    }
}

/// The binary interpreter
#[derive(Debug, Default)]
pub struct WasmVM {
    call_stack: Vec<ExecutionFrame>,
    last_trap: Option<Trap>,
}

impl WasmVM {
    /// Create an idle interpreter
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a function body with host arguments as its locals.
    ///
    /// An empty body yields `Undefined`; otherwise the result is the top of
    /// the operand stack as a number, or 0 if the stack is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_types::Value;
    /// use wasm_runtime::WasmVM;
    ///
    /// let mut vm = WasmVM::new();
    /// let add = [0x20, 0x00, 0x20, 0x01, 0x6A, 0x0F];
    /// let result = vm.execute_function(&add, &[Value::Number(3.0), Value::Number(4.0)]);
    /// assert_eq!(result, Value::Number(7.0));
    /// ```
    pub fn execute_function(&mut self, code: &[u8], args: &[Value]) -> Value {
        if code.is_empty() {
            return Value::Undefined;
        }
        let locals = args.iter().map(WasmValue::from_host).collect();
        Value::Number(self.execute_with_locals(code, locals).as_f64())
    }

    /// Run a function body with typed locals and return its typed result
    pub fn execute_with_locals(&mut self, code: &[u8], locals: Vec<WasmValue>) -> WasmValue {
        self.last_trap = None;
        self.call_stack.push(ExecutionFrame::new(code, locals));

        let mut result = WasmValue::default();
        while let Some(frame) = self.call_stack.last_mut() {
            let outcome = if frame.is_finished() {
                Ok(Step::Exit)
            } else {
                frame.step()
            };

            match outcome {
                Ok(Step::Continue) => continue,
                Ok(Step::Exit) => {}
                Err(trap) => {
                    debug!(%trap, "frame ended early");
                    self.last_trap = Some(trap);
                }
            }

            result = frame.result();
            self.call_stack.pop();
            // One frame per call until calls between functions exist
            break;
        }

        result
    }

    /// Why the most recent call ended early, if it did
    pub fn last_trap(&self) -> Option<Trap> {
        self.last_trap
    }

    /// Frames currently on the call stack
    pub fn call_depth(&self) -> usize {
        self.call_stack.len()
    }
}
