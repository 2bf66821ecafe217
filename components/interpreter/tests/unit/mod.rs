//! Unit tests for the interpreter crate

use bytecode_system::{BytecodeCompiler, Node, Opcode, Operand, Program};
use core_types::Value;
use interpreter::{BytecodeVM, FaultKind};

fn compile(ast: &Node) -> Program {
    BytecodeCompiler::new().compile(Some(ast), "test").unwrap()
}

#[test]
fn test_arithmetic_expression() {
    // (10 - 4) * 3 / 2
    let ast = Node::binary(
        "/",
        Node::binary(
            "*",
            Node::binary("-", Node::number(10.0), Node::number(4.0)),
            Node::number(3.0),
        ),
        Node::number(2.0),
    );
    let mut program = compile(&ast);
    let mut vm = BytecodeVM::new();

    assert_eq!(vm.execute(&mut program, &[]), Ok(Value::Number(9.0)));
}

#[test]
fn test_string_concatenation() {
    let ast = Node::binary("+", Node::string("n="), Node::number(3.0));
    let mut program = compile(&ast);
    let mut vm = BytecodeVM::new();

    assert_eq!(vm.execute(&mut program, &[]), Ok(Value::from("n=3")));
}

#[test]
fn test_call_placeholder_result() {
    let ast = Node::call("anything", vec![Node::number(1.0)]);
    let mut program = compile(&ast);
    let mut vm = BytecodeVM::new();

    assert_eq!(vm.execute(&mut program, &[]), Ok(Value::Number(42.0)));
    assert_eq!(vm.stats().function_calls, 1);
}

#[test]
fn test_parameters_seeded_from_arguments() {
    let ast = Node::binary("*", Node::identifier("a"), Node::identifier("b"));
    let mut program = BytecodeCompiler::new()
        .compile_function(Some(&ast), "mul", &["a", "b"])
        .unwrap();
    let mut vm = BytecodeVM::new();

    let result = vm.execute(&mut program, &[Value::Number(6.0), Value::Number(7.0)]);
    assert_eq!(result, Ok(Value::Number(42.0)));

    // Missing argument reads as undefined, which is NaN numerically
    let result = vm.execute(&mut program, &[Value::Number(6.0)]).unwrap();
    assert!(result.to_number().is_nan());
}

#[test]
fn test_extra_arguments_ignored() {
    let ast = Node::identifier("only");
    let mut program = BytecodeCompiler::new()
        .compile_function(Some(&ast), "first", &["only"])
        .unwrap();
    let mut vm = BytecodeVM::new();

    let args = [Value::from("x"), Value::from("y")];
    assert_eq!(vm.execute(&mut program, &args), Ok(Value::from("x")));
    assert_eq!(vm.registers().len(), 1);
}

#[test]
fn test_counters_grow_across_calls() {
    let ast = Node::number(1.0);
    let mut program = compile(&ast);
    let mut vm = BytecodeVM::new();

    for _ in 0..5 {
        vm.execute(&mut program, &[]).unwrap();
    }

    assert_eq!(program.hot_spots.count(0), 5);
    assert_eq!(program.hot_spots.count(1), 5);
    assert_eq!(vm.stats().instructions_executed, 10);
}

#[test]
fn test_fault_reports_pc() {
    let mut program = Program::new("underflow");
    program.emit(Opcode::Nop);
    program.emit(Opcode::Mul);
    let mut vm = BytecodeVM::new();

    let fault = vm.execute(&mut program, &[]).unwrap_err();
    assert_eq!(fault.kind, FaultKind::StackUnderflow);
    assert_eq!(fault.pc, 1);
}

#[test]
fn test_register_out_of_range_fault() {
    let mut program = Program::new("bad-reg");
    program.emit_with(Opcode::LoadVar, vec![Operand::Register(2)]);
    program.emit(Opcode::Return);
    let mut vm = BytecodeVM::new();

    let fault = vm.execute(&mut program, &[]).unwrap_err();
    assert_eq!(fault.kind, FaultKind::RegisterOutOfRange);
    assert_eq!(vm.execute_or_undefined(&mut program, &[]), Value::Undefined);
}

#[test]
fn test_return_leaves_stack() {
    let mut program = Program::new("two");
    let a = program.add_constant(Value::Number(1.0));
    let b = program.add_constant(Value::Number(2.0));
    program.emit_with(Opcode::LoadConst, vec![Operand::Constant(a)]);
    program.emit_with(Opcode::LoadConst, vec![Operand::Constant(b)]);
    program.emit(Opcode::Return);
    let mut vm = BytecodeVM::new();

    assert_eq!(vm.execute(&mut program, &[]), Ok(Value::Number(2.0)));
    assert_eq!(vm.stack_depth(), 2);
}
