//! Tests for the program container

use bytecode_system::{Opcode, Operand, Program, ProgramError};
use core_types::Value;

#[test]
fn test_new_program_is_empty() {
    let program = Program::new("empty");
    assert_eq!(program.name, "empty");
    assert_eq!(program.instruction_count(), 0);
    assert_eq!(program.constant_count(), 0);
    assert_eq!(program.optimization_level, 0);
    assert!(!program.is_optimized);
    assert!(program.hot_spots.is_empty());
}

#[test]
fn test_constant_indices_are_stable() {
    let mut program = Program::new("p");
    let first = program.add_constant(Value::from("a"));
    let second = program.add_constant(Value::Number(2.0));
    let third = program.add_constant(Value::from("a"));

    assert_eq!((first, second, third), (0, 1, 2));
    assert_eq!(program.constants[first as usize], Value::from("a"));
}

#[test]
fn test_validate_reports_first_violation() {
    let mut program = Program::new("p");
    program.add_constant(Value::Null);
    program.emit_with(Opcode::LoadConst, vec![Operand::Constant(0)]);
    program.emit_with(Opcode::LoadConst, vec![Operand::Constant(3)]);
    program.emit_with(Opcode::LoadVar, vec![Operand::Register(9)]);

    assert_eq!(
        program.validate(),
        Err(ProgramError::ConstantOutOfRange {
            pc: 1,
            index: 3,
            pool_size: 1
        })
    );
}

#[test]
fn test_immediates_are_not_range_checked() {
    let mut program = Program::new("p");
    program.emit_with(Opcode::Call, vec![Operand::Immediate(1000)]);
    assert!(program.validate().is_ok());
}

#[test]
fn test_hot_spots_record() {
    let mut program = Program::new("p");
    program.hot_spots.record(0);
    program.hot_spots.record(0);
    assert_eq!(program.hot_spots.count(0), 2);
}
