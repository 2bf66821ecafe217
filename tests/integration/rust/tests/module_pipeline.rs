//! Module Pipeline Integration Tests
//!
//! Tests the flow: bytes -> Module -> Instance -> WasmVM, through both the
//! typed API and the `WebAssembly` namespace.

use std::sync::Arc;

use core_types::{HostContext, Value};
use wasm_runtime::{Instance, Memory, Module, SectionId, WasmVM, WebAssembly, FIXED_EXPORTS};

const HEADER: [u8; 8] = [0x00, 0x61, 0x73, 0x6D, 0x01, 0x00, 0x00, 0x00];

fn numbers(values: &[f64]) -> Vec<Value> {
    values.iter().map(|&n| Value::Number(n)).collect()
}

/// Test: the bare preamble is a valid empty module
#[test]
fn test_preamble_only_module() {
    let mut module = Module::new(HEADER.to_vec());
    assert!(module.compile());
    assert!(module.sections().is_empty());
}

/// Test: any change to the magic number fails compilation
#[test]
fn test_every_bad_magic_fails() {
    for i in 0..4 {
        let mut bytes = HEADER.to_vec();
        bytes[i] ^= 0xFF;
        assert!(!Module::new(bytes.clone()).compile(), "byte {}", i);
        assert!(!WebAssembly::validate(&bytes));
    }
}

/// Test: grow is false exactly when current + delta exceeds the maximum
#[test]
fn test_memory_grow_boundary() {
    for (initial, maximum) in [(0, 0), (1, 1), (1, 16), (3, 1024)] {
        let mut memory = Memory::new(initial, maximum).unwrap();
        for delta in 0..=(maximum - initial + 2) {
            let expected = initial + delta <= maximum;
            assert_eq!(memory.grow(delta), expected, "{} + {} vs {}", initial, delta, maximum);
            assert_eq!(memory.size(), initial);
        }
    }
}

/// Test: the fixed opcode streams compute their documented results
#[test]
fn test_binary_interpreter_streams() {
    let mut vm = WasmVM::new();
    assert_eq!(vm.execute_function(&[0x41, 0x2A, 0x0F], &[]), Value::Number(42.0));
    assert_eq!(
        vm.execute_function(&[0x20, 0x00, 0x20, 0x01, 0x6A, 0x0F], &numbers(&[3.0, 4.0])),
        Value::Number(7.0)
    );
    assert_eq!(
        vm.execute_function(&[0x20, 0x00, 0x20, 0x01, 0x6C, 0x0F], &numbers(&[3.0, 4.0])),
        Value::Number(12.0)
    );
}

/// Test: exports are fixed regardless of the module's own sections
#[test]
fn test_exports_independent_of_module() {
    let mut with_exports = HEADER.to_vec();
    // export section naming "sum" plus a custom section
    with_exports.extend_from_slice(&[0x07, 0x07, 0x01, 0x03, b's', b'u', b'm', 0x00, 0x00]);
    with_exports.extend_from_slice(&[0x00, 0x02, 0x01, b'x']);

    for bytes in [HEADER.to_vec(), with_exports] {
        let mut ctx = HostContext::new();
        let mut instance = WebAssembly::instantiate(&mut ctx, &bytes).unwrap();

        let names: Vec<&str> = instance.exports().collect();
        let expected: Vec<&str> = FIXED_EXPORTS.iter().map(|e| e.name).collect();
        assert_eq!(names, expected);
        assert_eq!(instance.call_export("sum", &numbers(&[1.0, 2.0])), Value::Undefined);
        assert_eq!(instance.call_export("add", &numbers(&[1.0, 2.0])), Value::Number(3.0));
    }
}

/// Test: one module backs several independent instances
#[test]
fn test_shared_module_instances() {
    let mut bytes = HEADER.to_vec();
    bytes.extend_from_slice(&[0x0B, 0x01, 0x00]);
    let mut module = Module::new(bytes);
    assert!(module.compile());
    assert!(module.section(SectionId::Data).is_some());
    let module = Arc::new(module);

    let mut first = Instance::new(Arc::clone(&module));
    let mut second = Instance::new(Arc::clone(&module));
    assert!(first.instantiate());
    assert!(second.instantiate());

    first.memory_mut().unwrap().write(0, &[1, 2, 3]).unwrap();
    assert_eq!(second.memory().unwrap().read(0, 3).unwrap(), &[0, 0, 0]);
    assert_eq!(first.call_export("multiply", &numbers(&[-2.0, 21.0])), Value::Number(-42.0));
}

/// Test: host errors land in the context
#[test]
fn test_host_errors_through_context() {
    let mut ctx = HostContext::new();
    assert!(WebAssembly::compile(&mut ctx, &HEADER[..6]).is_none());
    assert!(ctx.take_exception().is_some());

    assert!(WebAssembly::memory(&mut ctx, &[]).is_none());
    assert!(ctx.has_exception());
}
