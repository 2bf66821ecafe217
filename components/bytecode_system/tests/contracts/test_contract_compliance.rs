//! Contract compliance tests for bytecode_system
//! Verifies the instruction set encoding and compiler guarantees

use bytecode_system::{BytecodeCompiler, CompileError, Node, Opcode, SyntaxNode};

/// Verify opcode byte values
#[test]
fn test_contract_opcode_bytes() {
    assert_eq!(Opcode::LoadConst.as_byte(), 0x01);
    assert_eq!(Opcode::LoadVar.as_byte(), 0x02);
    assert_eq!(Opcode::Add.as_byte(), 0x20);
    assert_eq!(Opcode::Sub.as_byte(), 0x21);
    assert_eq!(Opcode::Mul.as_byte(), 0x22);
    assert_eq!(Opcode::Div.as_byte(), 0x23);
    assert_eq!(Opcode::Call.as_byte(), 0x53);
    assert_eq!(Opcode::Return.as_byte(), 0x54);
    assert_eq!(Opcode::Nop.as_byte(), 0x80);
    assert_eq!(Opcode::Halt.as_byte(), 0x81);
}

#[test]
fn test_contract_unknown_byte_rejected() {
    assert_eq!(Opcode::from_byte(0x00), None);
    assert_eq!(Opcode::from_byte(0xFF), None);
}

/// compile(None) fails, compile(Some) always succeeds
#[test]
fn test_contract_compile_root_handling() {
    let mut compiler = BytecodeCompiler::new();
    assert!(matches!(
        compiler.compile(None, "none"),
        Err(CompileError::MissingRoot(_))
    ));

    let ast = Node::program(vec![]);
    let root: &dyn SyntaxNode = &ast;
    assert!(compiler.compile(Some(root), "some").is_ok());
}

/// Compiled programs end in RETURN and satisfy the operand invariant
#[test]
fn test_contract_compiled_program_invariants() {
    let ast = Node::program(vec![
        Node::expression_statement(Node::binary("/", Node::number(8.0), Node::number(2.0))),
        Node::expression_statement(Node::call("h", vec![Node::number(1.0)])),
    ]);
    let program = BytecodeCompiler::new().compile(Some(&ast), "main").unwrap();

    assert_eq!(program.instructions.last().unwrap().opcode, Opcode::Return);
    assert!(program.validate().is_ok());
    assert!(program.instructions.iter().all(|i| i.opcode != Opcode::Nop));
}
