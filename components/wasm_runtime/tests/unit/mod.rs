//! Unit tests for the wasm_runtime crate

use core_types::{HostContext, Value};
use wasm_runtime::leb128;
use wasm_runtime::{Module, SectionId, WasmVM, WebAssembly};

/// A module exporting `add(i32, i32) -> i32`, as a toolchain would emit it
fn add_module_bytes() -> Vec<u8> {
    vec![
        0x00, 0x61, 0x73, 0x6D, 0x01, 0x00, 0x00, 0x00, // preamble
        0x01, 0x07, 0x01, 0x60, 0x02, 0x7F, 0x7F, 0x01, 0x7F, // type: (i32, i32) -> i32
        0x03, 0x02, 0x01, 0x00, // function: one function of type 0
        0x07, 0x07, 0x01, 0x03, b'a', b'd', b'd', 0x00, 0x00, // export "add" = func 0
        0x0A, 0x09, 0x01, 0x07, 0x00, 0x20, 0x00, 0x20, 0x01, 0x6A, 0x0B, // code
    ]
}

#[test]
fn test_toolchain_module_sections() {
    let mut module = Module::new(add_module_bytes());
    assert!(module.compile());

    let ids: Vec<SectionId> = module.sections().iter().map(|s| s.id).collect();
    assert_eq!(
        ids,
        vec![
            SectionId::Type,
            SectionId::Function,
            SectionId::Export,
            SectionId::Code
        ]
    );
    assert_eq!(module.section(SectionId::Type).unwrap().size(), 7);
}

#[test]
fn test_export_section_name_decodes() {
    let mut module = Module::new(add_module_bytes());
    module.try_compile().unwrap();

    let exports = &module.section(SectionId::Export).unwrap().data;
    let mut pos = 0;
    assert_eq!(leb128::read_u32(exports, &mut pos), 1);
    assert_eq!(leb128::read_name(exports, &mut pos).as_deref(), Some("add"));
    assert_eq!(exports[pos], 0x00);
}

#[test]
fn test_code_section_body_runs() {
    let mut module = Module::new(add_module_bytes());
    module.try_compile().unwrap();

    // count, body size, local decl count, then the body
    let code = &module.section(SectionId::Code).unwrap().data;
    let body = &code[3..];

    let mut vm = WasmVM::new();
    let result = vm.execute_function(body, &[Value::Number(20.0), Value::Number(22.0)]);
    assert_eq!(result, Value::Number(42.0));
    assert!(vm.last_trap().is_none());
}

#[test]
fn test_multibyte_constant() {
    // i32.const 624485
    let body = [0x41, 0xE5, 0x8E, 0x26, 0x0B];
    let mut vm = WasmVM::new();
    assert_eq!(vm.execute_function(&body, &[]), Value::Number(624485.0));
}

#[test]
fn test_negative_constant_arithmetic() {
    // i32.const -128, i32.const 28, i32.sub
    let body = [0x41, 0x80, 0x7F, 0x41, 0x1C, 0x6B];
    let mut vm = WasmVM::new();
    assert_eq!(vm.execute_function(&body, &[]), Value::Number(-156.0));
}

#[test]
fn test_instantiate_toolchain_module_uses_fixed_exports() {
    let mut ctx = HostContext::new();
    let mut instance = WebAssembly::instantiate(&mut ctx, &add_module_bytes()).unwrap();
    assert_eq!(instance.module().sections().len(), 4);
    assert_eq!(
        instance.call_export("const42", &[Value::Number(1.0)]),
        Value::Number(42.0)
    );
}

#[test]
fn test_add_with_missing_argument() {
    let mut ctx = HostContext::new();
    let mut instance = WebAssembly::instantiate(&mut ctx, &add_module_bytes()[..8]).unwrap();

    // local 1 does not exist: the frame ends with the first operand on top
    let result = instance.call_export("add", &[Value::Number(5.0)]);
    assert_eq!(result, Value::Number(5.0));
    assert!(instance.vm().unwrap().last_trap().is_some());
}
