//! Contract tests for wasm_runtime API
//!
//! These tests verify the public API behaves as documented.

use std::sync::Arc;

use core_types::Value;
use wasm_runtime::{Instance, Memory, Module, ModuleError, WasmVM, PAGE_SIZE};

const HEADER: [u8; 8] = [0x00, 0x61, 0x73, 0x6D, 0x01, 0x00, 0x00, 0x00];

/// Test a preamble-only module compiles to zero sections
#[test]
fn test_header_only_module_contract() {
    let mut module = Module::new(HEADER.to_vec());
    assert!(module.compile());
    assert!(module.is_compiled());
    assert_eq!(module.sections().len(), 0);
}

/// Test a wrong magic number fails compilation
#[test]
fn test_bad_magic_contract() {
    let mut module = Module::new(vec![0x01, 0x61, 0x73, 0x6D, 0x01, 0x00, 0x00, 0x00]);
    assert!(!module.compile());
    assert!(!module.is_compiled());
    assert_eq!(module.try_compile(), Err(ModuleError::BadMagic));
}

/// Test a section running past the end fails compilation
#[test]
fn test_truncated_section_contract() {
    let mut bytes = HEADER.to_vec();
    bytes.extend_from_slice(&[0x0B, 0x10, 0x00, 0x00]);
    let mut module = Module::new(bytes);
    assert!(!module.compile());
    assert!(module.sections().is_empty());
}

/// Test grow() only checks against the maximum
#[test]
fn test_memory_grow_contract() {
    let mut memory = Memory::new(1, 4).unwrap();
    assert!(memory.grow(3));
    assert!(!memory.grow(4));
    assert_eq!(memory.size(), 1);
    assert_eq!(memory.byte_len(), PAGE_SIZE);
}

/// Test the constant body produces 42
#[test]
fn test_const_body_contract() {
    let mut vm = WasmVM::new();
    assert_eq!(vm.execute_function(&[0x41, 0x2A, 0x0F], &[]), Value::Number(42.0));
}

/// Test an empty body produces undefined
#[test]
fn test_empty_body_contract() {
    let mut vm = WasmVM::new();
    assert_eq!(vm.execute_function(&[], &[Value::Number(1.0)]), Value::Undefined);
}

/// Test instantiation exposes add, multiply and const42
#[test]
fn test_instance_exports_contract() {
    let mut module = Module::new(HEADER.to_vec());
    module.compile();
    let mut instance = Instance::new(Arc::new(module));
    assert!(instance.instantiate());

    for name in ["add", "multiply", "const42"] {
        assert!(instance.get_export(name).is_some(), "missing export {}", name);
    }

    let args = [Value::Number(3.0), Value::Number(4.0)];
    assert_eq!(instance.call_export("add", &args), Value::Number(7.0));
    assert_eq!(instance.call_export("multiply", &args), Value::Number(12.0));
    assert_eq!(instance.call_export("nope", &args), Value::Undefined);
}

/// Test instantiate() refuses an uncompiled module
#[test]
fn test_instantiate_requires_compile_contract() {
    let mut instance = Instance::new(Arc::new(Module::new(HEADER.to_vec())));
    assert!(!instance.instantiate());
    assert_eq!(instance.try_instantiate(), Err(ModuleError::NotCompiled));
}
