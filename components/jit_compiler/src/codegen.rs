//! Native code generator for fixed-shape numeric kernels
//!
//! Each [`KernelShape`] lowers to a short x86-64 sequence following the
//! System V calling convention: `a` arrives in `rdi`, `b` in `rsi`, the
//! result leaves in `rax`. The assembled bytes are mapped executable and
//! wrapped in a [`CompiledEntry`].

use std::fmt;
use std::str::FromStr;

use bytecode_system::{Opcode, Operand, Program};
use core_types::ObjectRef;
use tracing::info;

use crate::assembler::{Assembler, Reg};
use crate::error::{CodegenError, CodegenResult};
use crate::exec_memory::ExecutableRegion;

/// Signature of every generated entry point
pub type KernelFn = extern "C" fn(i64, i64) -> i64;

/// Register-register arithmetic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    /// Wrapping addition
    Add,
    /// Wrapping subtraction
    Sub,
    /// Wrapping multiplication
    Mul,
}

impl ArithOp {
    /// Same computation in Rust, with the same wrapping behavior
    pub fn apply(self, a: i64, b: i64) -> i64 {
        match self {
            ArithOp::Add => a.wrapping_add(b),
            ArithOp::Sub => a.wrapping_sub(b),
            ArithOp::Mul => a.wrapping_mul(b),
        }
    }

    /// Accumulator start value for a counted loop
    pub fn identity(self) -> i64 {
        match self {
            ArithOp::Mul => 1,
            ArithOp::Add | ArithOp::Sub => 0,
        }
    }

    fn emit(self, asm: &mut Assembler, dst: Reg, src: Reg) {
        match self {
            ArithOp::Add => asm.add(dst, src),
            ArithOp::Sub => asm.sub(dst, src),
            ArithOp::Mul => asm.imul(dst, src),
        }
    }

    fn from_opcode(opcode: Opcode) -> Option<Self> {
        match opcode {
            Opcode::Add => Some(ArithOp::Add),
            Opcode::Sub => Some(ArithOp::Sub),
            Opcode::Mul => Some(ArithOp::Mul),
            _ => None,
        }
    }
}

impl fmt::Display for ArithOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArithOp::Add => "add",
            ArithOp::Sub => "sub",
            ArithOp::Mul => "mul",
        };
        f.write_str(name)
    }
}

/// Function shapes the generator knows how to emit
#[derive(Debug, Clone)]
pub enum KernelShape {
    /// `a op b`
    Arithmetic(ArithOp),
    /// Always returns the immediate
    Constant(i64),
    /// `acc = acc op b`, repeated `a` times
    CountedLoop {
        /// Loop body operation
        step: ArithOp,
    },
    /// Numeric property read at compile time
    PropertyLoad {
        /// Object holding the property
        object: ObjectRef,
        /// Property name
        key: String,
    },
}

impl KernelShape {
    /// Reference semantics, used to check native results
    pub fn evaluate(&self, a: i64, b: i64) -> CodegenResult<i64> {
        match self {
            KernelShape::Arithmetic(op) => Ok(op.apply(a, b)),
            KernelShape::Constant(n) => Ok(*n),
            KernelShape::CountedLoop { step } => {
                let mut acc = step.identity();
                for _ in 0..a.max(0) {
                    acc = step.apply(acc, b);
                }
                Ok(acc)
            }
            KernelShape::PropertyLoad { object, key } => property_immediate(object, key),
        }
    }

    /// Recognize a kernel in a compiled program.
    ///
    /// Matches `LOAD_VAR r0; LOAD_VAR r1; ADD|SUB|MUL; RETURN` over two
    /// parameters and `LOAD_CONST c; RETURN` with an integral constant.
    pub fn recognize(program: &Program) -> Option<KernelShape> {
        let ops: Vec<(Opcode, Option<Operand>)> = program
            .instructions
            .iter()
            .map(|inst| (inst.opcode, inst.first_operand()))
            .collect();

        match ops.as_slice() {
            [(Opcode::LoadVar, Some(Operand::Register(0))), (Opcode::LoadVar, Some(Operand::Register(1))), (op, _), (Opcode::Return, _)]
                if program.parameter_count == 2 =>
            {
                ArithOp::from_opcode(*op).map(KernelShape::Arithmetic)
            }
            [(Opcode::LoadConst, Some(Operand::Constant(idx))), (Opcode::Return, _)] => {
                let n = program.constants.get(*idx as usize)?.to_number();
                if n.is_finite() && n.fract() == 0.0 && n.abs() <= i64::MAX as f64 {
                    Some(KernelShape::Constant(n as i64))
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Short name for logs
    pub fn name(&self) -> String {
        match self {
            KernelShape::Arithmetic(op) => op.to_string(),
            KernelShape::Constant(n) => format!("const:{}", n),
            KernelShape::CountedLoop { step } => format!("loop-{}", step),
            KernelShape::PropertyLoad { key, .. } => format!("prop:{}", key),
        }
    }
}

impl FromStr for KernelShape {
    type Err = CodegenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let arith = |name: &str| match name {
            "add" => Some(ArithOp::Add),
            "sub" => Some(ArithOp::Sub),
            "mul" => Some(ArithOp::Mul),
            _ => None,
        };

        if let Some(op) = arith(s) {
            return Ok(KernelShape::Arithmetic(op));
        }
        if let Some(step) = s.strip_prefix("loop-").and_then(arith) {
            return Ok(KernelShape::CountedLoop { step });
        }
        if let Some(n) = s.strip_prefix("const:").and_then(|n| n.parse::<i64>().ok()) {
            return Ok(KernelShape::Constant(n));
        }
        Err(CodegenError::UnknownShape(s.to_string()))
    }
}

fn property_immediate(object: &ObjectRef, key: &str) -> CodegenResult<i64> {
    let value = object.borrow().get_property(key);
    if !value.is_number() {
        return Err(CodegenError::PropertyNotNumeric(key.to_string()));
    }
    Ok(value.to_number() as i64)
}

/// Machine code mapped executable, callable as [`KernelFn`]
///
/// Not `Clone`: the entry owns its region and unmaps it once on drop.
#[derive(Debug)]
pub struct CompiledEntry {
    name: String,
    entry: KernelFn,
    region: ExecutableRegion,
}

impl CompiledEntry {
    /// Call the generated code
    pub fn call(&self, a: i64, b: i64) -> i64 {
        (self.entry)(a, b)
    }

    /// Shape name this entry was built from
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Size of the generated code in bytes
    pub fn code_size(&self) -> usize {
        self.region.code_len()
    }

    /// Generated machine code
    pub fn code(&self) -> &[u8] {
        self.region.code()
    }
}

/// Assembles kernel shapes and maps them executable
#[derive(Debug, Default)]
pub struct NativeCodeGenerator {
    functions_compiled: u64,
}

impl NativeCodeGenerator {
    /// Create a generator
    pub fn new() -> Self {
        Self {
            functions_compiled: 0,
        }
    }

    /// Number of successful [`NativeCodeGenerator::compile`] calls
    pub fn functions_compiled(&self) -> u64 {
        self.functions_compiled
    }

    /// Encode `shape` without mapping it
    pub fn assemble(&self, shape: &KernelShape) -> CodegenResult<Vec<u8>> {
        let mut asm = Assembler::new();
        asm.prologue();
        match shape {
            KernelShape::Arithmetic(op) => {
                asm.mov(Reg::Rax, Reg::Rdi);
                op.emit(&mut asm, Reg::Rax, Reg::Rsi);
            }
            KernelShape::Constant(n) => asm.mov_imm64(Reg::Rax, *n),
            KernelShape::CountedLoop { step } => {
                asm.mov_imm64(Reg::Rax, step.identity());
                asm.mov(Reg::Rcx, Reg::Rdi);
                asm.test(Reg::Rcx, Reg::Rcx);
                let skip = asm.jle_forward();
                let top = asm.label();
                step.emit(&mut asm, Reg::Rax, Reg::Rsi);
                asm.dec(Reg::Rcx);
                asm.jnz(top);
                asm.bind(skip);
            }
            KernelShape::PropertyLoad { object, key } => {
                asm.mov_imm64(Reg::Rax, property_immediate(object, key)?);
            }
        }
        asm.epilogue();
        Ok(asm.finish())
    }

    /// Assemble `shape`, map it executable and return the callable entry
    pub fn compile(&mut self, shape: &KernelShape) -> CodegenResult<CompiledEntry> {
        if !cfg!(all(target_arch = "x86_64", unix)) {
            return Err(CodegenError::UnsupportedTarget);
        }

        let code = self.assemble(shape)?;
        let region = ExecutableRegion::new(&code)?;

        // SAFETY: the region holds a complete function assembled above for
        // the System V ABI with signature (i64, i64) -> i64; it stays mapped
        // for as long as the CompiledEntry owning both lives.
        let entry: KernelFn = unsafe { std::mem::transmute::<*const u8, KernelFn>(region.as_ptr()) };

        self.functions_compiled += 1;
        info!(shape = %shape.name(), bytes = code.len(), "compiled native kernel");
        Ok(CompiledEntry {
            name: shape.name(),
            entry,
            region,
        })
    }
}
