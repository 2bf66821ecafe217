//! Tests for the lowering compiler

use bytecode_system::{BytecodeCompiler, Node, NodeKind, Opcode, Operand};
use core_types::Value;

fn opcodes(program: &bytecode_system::Program) -> Vec<Opcode> {
    program.instructions.iter().map(|i| i.opcode).collect()
}

#[test]
fn test_literal_program() {
    let ast = Node::program(vec![Node::expression_statement(Node::number(42.0))]);
    let program = BytecodeCompiler::new().compile(Some(&ast), "lit").unwrap();

    assert_eq!(opcodes(&program), vec![Opcode::LoadConst, Opcode::Return]);
    assert_eq!(program.constants, vec![Value::Number(42.0)]);
    assert_eq!(program.optimization_level, 2);
    assert!(!program.is_optimized);
}

#[test]
fn test_same_literal_twice_gets_two_slots() {
    let ast = Node::binary("+", Node::number(1.0), Node::number(1.0));
    let program = BytecodeCompiler::new().compile(Some(&ast), "dup").unwrap();

    assert_eq!(program.constant_count(), 2);
    assert_eq!(program.instructions[0].operands, vec![Operand::Constant(0)]);
    assert_eq!(program.instructions[1].operands, vec![Operand::Constant(1)]);
}

#[test]
fn test_nested_expression_order() {
    // (1 + 2) * 3
    let ast = Node::binary(
        "*",
        Node::binary("+", Node::number(1.0), Node::number(2.0)),
        Node::number(3.0),
    );
    let program = BytecodeCompiler::new().compile(Some(&ast), "nested").unwrap();

    assert_eq!(
        opcodes(&program),
        vec![
            Opcode::LoadConst,
            Opcode::LoadConst,
            Opcode::Add,
            Opcode::LoadConst,
            Opcode::Mul,
            Opcode::Return
        ]
    );
}

#[test]
fn test_unrecognized_kinds_never_fail() {
    let ast = Node::block(vec![
        Node::with_children(NodeKind::VariableDeclaration, vec![]),
        Node::with_children(NodeKind::MemberExpression, vec![]),
        Node::number(7.0),
    ]);
    let mut compiler = BytecodeCompiler::new();
    compiler.set_optimization_enabled(false);
    let program = compiler.compile(Some(&ast), "mixed").unwrap();

    assert_eq!(
        opcodes(&program),
        vec![Opcode::Nop, Opcode::Nop, Opcode::LoadConst, Opcode::Return]
    );

    compiler.set_optimization_enabled(true);
    let program = compiler.compile(Some(&ast), "mixed").unwrap();
    assert_eq!(opcodes(&program), vec![Opcode::LoadConst, Opcode::Return]);
}

#[test]
fn test_always_ends_with_return() {
    let shapes = vec![
        Node::number(1.0),
        Node::string("s"),
        Node::call("g", vec![]),
        Node::identifier("free"),
        Node::program(vec![]),
    ];
    for ast in &shapes {
        let program = BytecodeCompiler::new().compile(Some(ast), "shape").unwrap();
        assert_eq!(program.instructions.last().unwrap().opcode, Opcode::Return);
        assert!(program.validate().is_ok());
    }
}

#[test]
fn test_custom_optimization_level_recorded() {
    let ast = Node::number(1.0);
    let program = BytecodeCompiler::new()
        .with_optimization_level(1)
        .compile(Some(&ast), "lvl")
        .unwrap();
    assert_eq!(program.optimization_level, 1);
}
