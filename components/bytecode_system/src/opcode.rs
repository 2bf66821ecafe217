//! Bytecode opcodes
//!
//! A closed set: every handler in the interpreter matches over this enum, so
//! adding an opcode is a compile error until it is handled everywhere.

/// Bytecode opcodes for the stack/register machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// Push a constant pool value (operand: constant index)
    LoadConst,
    /// Push a register value (operand: register index)
    LoadVar,
    /// Pop two values, push their sum or textual concatenation
    Add,
    /// Pop two values, push their numeric difference
    Sub,
    /// Pop two values, push their numeric product
    Mul,
    /// Pop two values, push their numeric quotient
    Div,
    /// Call (operand: argument count immediate); pushes a placeholder result
    Call,
    /// End the frame; the top of stack is the result
    Return,
    /// Stop execution
    Halt,
    /// No operation
    Nop,
}

impl Opcode {
    /// Encoded byte for this opcode
    pub fn as_byte(self) -> u8 {
        match self {
            Opcode::LoadConst => 0x01,
            Opcode::LoadVar => 0x02,
            Opcode::Add => 0x20,
            Opcode::Sub => 0x21,
            Opcode::Mul => 0x22,
            Opcode::Div => 0x23,
            Opcode::Call => 0x53,
            Opcode::Return => 0x54,
            Opcode::Nop => 0x80,
            Opcode::Halt => 0x81,
        }
    }

    /// Decode an opcode byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        let opcode = match byte {
            0x01 => Opcode::LoadConst,
            0x02 => Opcode::LoadVar,
            0x20 => Opcode::Add,
            0x21 => Opcode::Sub,
            0x22 => Opcode::Mul,
            0x23 => Opcode::Div,
            0x53 => Opcode::Call,
            0x54 => Opcode::Return,
            0x80 => Opcode::Nop,
            0x81 => Opcode::Halt,
            _ => return None,
        };
        Some(opcode)
    }

    /// Assembly mnemonic
    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::LoadConst => "LOAD_CONST",
            Opcode::LoadVar => "LOAD_VAR",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mul => "MUL",
            Opcode::Div => "DIV",
            Opcode::Call => "CALL",
            Opcode::Return => "RETURN",
            Opcode::Halt => "HALT",
            Opcode::Nop => "NOP",
        }
    }

    /// Check if this opcode ends execution of the program
    pub fn is_terminator(self) -> bool {
        matches!(self, Opcode::Return | Opcode::Halt)
    }

    /// Check if this opcode is a binary arithmetic operation
    pub fn is_binary_arithmetic(self) -> bool {
        matches!(self, Opcode::Add | Opcode::Sub | Opcode::Mul | Opcode::Div)
    }
}
