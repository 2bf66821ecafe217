//! Lowering compiler from syntax tree to bytecode
//!
//! The compiler never rejects a tree: node kinds it does not understand
//! become NOP placeholders, which the optimizer later removes.

use core_types::{HostContext, Value};
use tracing::debug;

use crate::ast::{NodeKind, SyntaxNode};
use crate::error::CompileError;
use crate::instruction::Operand;
use crate::opcode::Opcode;
use crate::optimizer::Optimizer;
use crate::program::Program;

/// Callee identity used when a call node does not name its target
const ANONYMOUS_CALLEE: &str = "function";

/// Compiles syntax trees into [`Program`]s
#[derive(Debug)]
pub struct BytecodeCompiler {
    optimization_enabled: bool,
    optimization_level: u32,
    next_register: u32,
    parameters: Vec<String>,
}

impl BytecodeCompiler {
    /// Create a compiler with optimization enabled at level 2
    pub fn new() -> Self {
        Self {
            optimization_enabled: true,
            optimization_level: 2,
            next_register: 0,
            parameters: Vec::new(),
        }
    }

    /// Builder-style optimization level
    pub fn with_optimization_level(mut self, level: u32) -> Self {
        self.optimization_level = level;
        self
    }

    /// Enable or disable the optimization pass
    pub fn set_optimization_enabled(&mut self, enabled: bool) {
        self.optimization_enabled = enabled;
    }

    /// Set the optimization level used when optimization is enabled
    pub fn set_optimization_level(&mut self, level: u32) {
        self.optimization_level = level;
    }

    /// Whether the optimization pass runs
    pub fn optimization_enabled(&self) -> bool {
        self.optimization_enabled
    }

    /// Configured optimization level
    pub fn optimization_level(&self) -> u32 {
        self.optimization_level
    }

    /// Lower `root` into a program named `name`
    pub fn compile(
        &mut self,
        root: Option<&dyn SyntaxNode>,
        name: &str,
    ) -> Result<Program, CompileError> {
        self.compile_function(root, name, &[])
    }

    /// Lower `root` as a function body whose parameters occupy the first registers
    pub fn compile_function(
        &mut self,
        root: Option<&dyn SyntaxNode>,
        name: &str,
        params: &[&str],
    ) -> Result<Program, CompileError> {
        let root = root.ok_or_else(|| CompileError::MissingRoot(name.to_string()))?;

        self.parameters = params.iter().map(|p| p.to_string()).collect();
        self.next_register = 0;
        for _ in params {
            self.allocate_register();
        }

        let mut program = Program::new(name);
        program.parameter_count = params.len() as u32;

        let mut ctx = HostContext::new();
        self.lower(root, &mut program, &mut ctx);

        if !matches!(
            program.instructions.last().map(|i| i.opcode),
            Some(Opcode::Return)
        ) {
            program.emit(Opcode::Return);
        }

        program.register_count = self.next_register;

        if self.optimization_enabled {
            Optimizer::with_level(self.optimization_level).optimize(&mut program);
        }

        debug!(
            program = %program.name,
            instructions = program.instruction_count(),
            constants = program.constant_count(),
            registers = program.register_count,
            "compiled program"
        );
        Ok(program)
    }

    fn allocate_register(&mut self) -> u32 {
        let reg = self.next_register;
        self.next_register += 1;
        reg
    }

    fn lower(&mut self, node: &dyn SyntaxNode, program: &mut Program, ctx: &mut HostContext) {
        let kind = node.kind();
        match kind {
            k if k.is_literal() => {
                let value = node.evaluate(ctx);
                self.emit_constant(program, value);
            }
            NodeKind::BinaryExpression => {
                for child in node.children() {
                    self.lower(child, program, ctx);
                }
                program.emit(binary_opcode(node.operator()));
            }
            NodeKind::CallExpression => {
                let callee = node.callee_name().unwrap_or(ANONYMOUS_CALLEE).to_string();
                self.emit_constant(program, Value::String(callee));
                let argc = node.children().len() as u32;
                program.emit_with(Opcode::Call, vec![Operand::Immediate(argc)]);
            }
            NodeKind::Identifier => match self.parameter_register(node.name()) {
                Some(reg) => program.emit_with(Opcode::LoadVar, vec![Operand::Register(reg)]),
                None => program.emit(Opcode::Nop),
            },
            k if k.is_sequence() => {
                for child in node.children() {
                    self.lower(child, program, ctx);
                }
            }
            _ => program.emit(Opcode::Nop),
        }
    }

    fn emit_constant(&mut self, program: &mut Program, value: Value) {
        let index = program.add_constant(value);
        program.emit_with(Opcode::LoadConst, vec![Operand::Constant(index)]);
    }

    fn parameter_register(&self, name: Option<&str>) -> Option<u32> {
        let name = name?;
        self.parameters
            .iter()
            .position(|p| p == name)
            .map(|i| i as u32)
    }
}

impl Default for BytecodeCompiler {
    fn default() -> Self {
        Self::new()
    }
}

/// Arithmetic opcode for a binary operator; unknown operators add
fn binary_opcode(operator: Option<&str>) -> Opcode {
    match operator {
        Some("-") => Opcode::Sub,
        Some("*") => Opcode::Mul,
        Some("/") => Opcode::Div,
        _ => Opcode::Add,
    }
}
