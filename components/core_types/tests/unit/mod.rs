//! Unit tests for core_types collaborators

use core_types::{ErrorKind, HostContext, JsObject, Value};

#[test]
fn test_numeric_string_coercion() {
    assert_eq!(Value::from("1.5").to_number(), 1.5);
    assert_eq!(Value::from("1e3").to_number(), 1000.0);
}

#[test]
fn test_concatenation_forms() {
    let left = Value::from("x=");
    let right = Value::Number(4.0);
    assert_eq!(
        format!("{}{}", left.to_display_string(), right.to_display_string()),
        "x=4"
    );
}

#[test]
fn test_object_shared_through_value() {
    let handle = JsObject::new_ref();
    let value = Value::Object(handle.clone());

    handle.borrow_mut().set_property("length", Value::Number(8.0));

    let seen = value.as_object().unwrap().borrow().get_property("length");
    assert_eq!(seen, Value::Number(8.0));
}

#[test]
fn test_context_records_kind() {
    let mut ctx = HostContext::new();
    ctx.throw_error("instantiation failed");
    assert_eq!(ctx.exception().map(|e| e.kind), Some(ErrorKind::Error));
}
