//! Minimal object model: a bag of named properties.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::value::Value;

/// Shared handle to an object
pub type ObjectRef = Rc<RefCell<JsObject>>;

/// An object exposing named property get/set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsObject {
    properties: HashMap<String, Value>,
}

impl JsObject {
    /// Create an empty object
    pub fn new() -> Self {
        Self {
            properties: HashMap::new(),
        }
    }

    /// Create an empty object behind a shared handle
    pub fn new_ref() -> ObjectRef {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Read a property; missing properties read as `undefined`
    pub fn get_property(&self, key: &str) -> Value {
        self.properties
            .get(key)
            .cloned()
            .unwrap_or(Value::Undefined)
    }

    /// Write a property, replacing any previous value
    pub fn set_property(&mut self, key: impl Into<String>, value: Value) {
        self.properties.insert(key.into(), value);
    }

    /// Whether the property exists
    pub fn has_property(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    /// Number of own properties
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Whether the object has no properties
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}
