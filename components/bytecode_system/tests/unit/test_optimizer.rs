//! Tests for optimizer module

use bytecode_system::{Opcode, Operand, Optimizer, Program};
use core_types::Value;

#[test]
fn test_nops_removed_order_kept() {
    let mut program = Program::new("p");
    let a = program.add_constant(Value::Number(1.0));
    let b = program.add_constant(Value::Number(2.0));
    program.emit(Opcode::Nop);
    program.emit_with(Opcode::LoadConst, vec![Operand::Constant(a)]);
    program.emit(Opcode::Nop);
    program.emit(Opcode::Nop);
    program.emit_with(Opcode::LoadConst, vec![Operand::Constant(b)]);
    program.emit(Opcode::Sub);
    program.emit(Opcode::Return);

    Optimizer::new().optimize(&mut program);

    let kept: Vec<Opcode> = program.instructions.iter().map(|i| i.opcode).collect();
    assert_eq!(
        kept,
        vec![Opcode::LoadConst, Opcode::LoadConst, Opcode::Sub, Opcode::Return]
    );
    assert_eq!(program.instructions[0].operands, vec![Operand::Constant(a)]);
    assert_eq!(program.instructions[1].operands, vec![Operand::Constant(b)]);
}

#[test]
fn test_dead_code_after_return_at_level_three() {
    let mut program = Program::new("p");
    program.emit(Opcode::Return);
    program.emit(Opcode::Add);
    program.emit(Opcode::Nop);

    Optimizer::with_level(3).optimize(&mut program);

    assert_eq!(program.instructions.len(), 1);
    assert_eq!(program.instructions[0].opcode, Opcode::Return);
}

#[test]
fn test_constants_untouched() {
    let mut program = Program::new("p");
    program.add_constant(Value::from("keep"));
    program.emit(Opcode::Nop);
    program.emit(Opcode::Return);

    Optimizer::new().optimize(&mut program);

    assert_eq!(program.constant_count(), 1);
}
