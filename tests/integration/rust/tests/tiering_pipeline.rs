//! Tiering Pipeline Integration Tests
//!
//! Tests the flow: Program -> BytecodeVM (profiling) -> TieringBridge ->
//! NativeCodeGenerator, and that promotion never changes results.

use std::sync::Arc;
use std::thread;

use bytecode_system::{BytecodeCompiler, Node, Opcode, Program};
use core_types::Value;
use interpreter::BytecodeVM;
use jit_compiler::{
    CodeRegistry, FunctionId, KernelShape, NativeCodeGenerator, TieringBridge, HOT_SPOT_THRESHOLD,
    MIN_HOT_SPOTS, PROMOTED_LEVEL,
};

fn program_with_counts(counts: &[u64]) -> Program {
    let mut program = Program::new("counted");
    for (pc, &n) in counts.iter().enumerate() {
        for _ in 0..n {
            program.hot_spots.record(pc);
        }
    }
    program
}

/// Test: promotion needs breadth, not one very hot pc
#[test]
fn test_should_promote_iff_three_hot_pcs() {
    let bridge = TieringBridge::new();
    let t = HOT_SPOT_THRESHOLD;

    let cases: Vec<(Vec<u64>, bool)> = vec![
        (vec![], false),
        (vec![t * 1000], false),
        (vec![t * 1000, t * 1000], false),
        (vec![t, t, t - 1], false),
        (vec![t, t, t], true),
        (vec![t - 1, t, t, t, 0], true),
        (vec![1; 50], false),
    ];

    for (counts, expected) in cases {
        let program = program_with_counts(&counts);
        let hot = counts.iter().filter(|&&n| n >= t).count();
        assert_eq!(hot >= MIN_HOT_SPOTS, expected);
        assert_eq!(bridge.should_promote(&program), expected, "{:?}", counts);
    }
}

/// Test: profiling VM runs drive promotion, and promotion is one-shot
#[test]
fn test_vm_runs_drive_promotion() {
    let body = Node::binary("-", Node::identifier("a"), Node::identifier("b"));
    let mut program = BytecodeCompiler::new()
        .compile_function(Some(&body), "sub", &["a", "b"])
        .unwrap();
    let bridge = TieringBridge::new();
    let mut vm = BytecodeVM::new();
    let args = [Value::Number(50.0), Value::Number(8.0)];

    for _ in 0..HOT_SPOT_THRESHOLD - 1 {
        assert_eq!(vm.execute(&mut program, &args), Ok(Value::Number(42.0)));
    }
    assert!(!bridge.should_promote(&program));

    vm.execute(&mut program, &args).unwrap();
    assert!(bridge.should_promote(&program));
    assert!(bridge.promote(&mut program));
    assert!(program.is_optimized);
    assert_eq!(program.optimization_level, PROMOTED_LEVEL);
    assert!(!bridge.promote(&mut program));

    // Promoted programs still interpret to the same value
    assert_eq!(vm.execute(&mut program, &args), Ok(Value::Number(42.0)));
    assert_eq!(vm.stats().optimized_paths_taken, 1);
}

/// Test: profiling off leaves the program cold
#[test]
fn test_profiling_disabled_never_promotes() {
    let mut program = BytecodeCompiler::new()
        .compile(Some(&Node::binary("+", Node::number(1.0), Node::number(2.0))), "cold")
        .unwrap();
    let mut vm = BytecodeVM::new();
    vm.enable_profiling(false);
    for _ in 0..100 {
        vm.execute(&mut program, &[]).unwrap();
    }
    assert!(program.hot_spots.is_empty());
    assert!(!TieringBridge::new().should_promote(&program));
    assert_eq!(vm.stats().instructions_executed, 400);
}

/// Test: recognized kernels agree with the interpreter
#[cfg(all(target_arch = "x86_64", unix))]
#[test]
fn test_native_kernels_match_interpreter() {
    let mut generator = NativeCodeGenerator::new();
    let mut vm = BytecodeVM::new();

    for (op, opcode) in [("+", Opcode::Add), ("-", Opcode::Sub), ("*", Opcode::Mul)] {
        let body = Node::binary(op, Node::identifier("x"), Node::identifier("y"));
        let mut program = BytecodeCompiler::new()
            .compile_function(Some(&body), op, &["x", "y"])
            .unwrap();
        assert_eq!(program.instructions[2].opcode, opcode);

        let shape = KernelShape::recognize(&program).unwrap();
        let entry = generator.compile(&shape).unwrap();

        for (a, b) in [(3i64, 4i64), (-7, 2), (0, 0), (1000, -1000)] {
            let interpreted = vm
                .execute(&mut program, &[Value::Number(a as f64), Value::Number(b as f64)])
                .unwrap();
            assert_eq!(interpreted, Value::Number(entry.call(a, b) as f64));
        }
    }
    assert_eq!(generator.functions_compiled(), 3);
}

/// Test: a constant function compiles to a constant kernel
#[cfg(all(target_arch = "x86_64", unix))]
#[test]
fn test_constant_program_kernel() {
    let program = BytecodeCompiler::new()
        .compile(Some(&Node::number(-17.0)), "k")
        .unwrap();
    let shape = KernelShape::recognize(&program).unwrap();
    assert!(matches!(shape, KernelShape::Constant(-17)));

    let entry = NativeCodeGenerator::new().compile(&shape).unwrap();
    assert_eq!(entry.call(99, 99), -17);
}

/// Test: concurrent compile requests share one entry
#[cfg(all(target_arch = "x86_64", unix))]
#[test]
fn test_registry_compiles_once_across_threads() {
    let registry = Arc::new(CodeRegistry::new());
    let id = FunctionId(7);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                let mut generator = NativeCodeGenerator::new();
                let entry = registry
                    .get_or_compile(id, || generator.compile(&"loop-mul".parse()?))
                    .unwrap();
                entry.call(3, 2)
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 8);
    }
    assert_eq!(registry.len(), 1);
    assert!(registry.is_compiled(id));
}
