//! Module instances and their export table

use std::sync::Arc;

use core_types::Value;
use tracing::{debug, warn};

use crate::error::ModuleError;
use crate::memory::Memory;
use crate::module::Module;
use crate::vm::WasmVM;

/// Pages allocated for an instance's linear memory
pub const INSTANCE_INITIAL_PAGES: u32 = 1;
/// Page ceiling for an instance's linear memory
pub const INSTANCE_MAX_PAGES: u32 = 1024;

/// A named callable backed by a function body for [`WasmVM`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportedFunction {
    /// Export name
    pub name: &'static str,
    /// Number of arguments the body reads
    pub arity: usize,
    /// Opcode bytes
    pub body: &'static [u8],
}

/// The export table every instance exposes.
///
/// Exports are not resolved from the module's own export and code sections;
/// each instance gets these hand-written bodies.
pub const FIXED_EXPORTS: [ExportedFunction; 3] = [
    ExportedFunction {
        name: "add",
        arity: 2,
        // local.get 0, local.get 1, i32.add, return
        body: &[0x20, 0x00, 0x20, 0x01, 0x6A, 0x0F],
    },
    ExportedFunction {
        name: "multiply",
        arity: 2,
        // local.get 0, local.get 1, i32.mul, return
        body: &[0x20, 0x00, 0x20, 0x01, 0x6C, 0x0F],
    },
    ExportedFunction {
        name: "const42",
        arity: 0,
        // i32.const 42, return
        body: &[0x41, 0x2A, 0x0F],
    },
];

/// An instantiated module: linear memory, interpreter and exports.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use core_types::Value;
/// use wasm_runtime::{Instance, Module};
///
/// let mut module = Module::new(vec![0x00, 0x61, 0x73, 0x6D, 0x01, 0x00, 0x00, 0x00]);
/// assert!(module.compile());
///
/// let mut instance = Instance::new(Arc::new(module));
/// assert!(instance.instantiate());
/// let sum = instance.call_export("add", &[Value::Number(3.0), Value::Number(4.0)]);
/// assert_eq!(sum, Value::Number(7.0));
/// ```
#[derive(Debug)]
pub struct Instance {
    module: Arc<Module>,
    memory: Option<Memory>,
    vm: Option<WasmVM>,
    exports: Vec<ExportedFunction>,
}

impl Instance {
    /// Wrap a module; nothing is allocated until instantiation
    pub fn new(module: Arc<Module>) -> Self {
        Self {
            module,
            memory: None,
            vm: None,
            exports: Vec::new(),
        }
    }

    /// Instantiate, reporting only success
    pub fn instantiate(&mut self) -> bool {
        match self.try_instantiate() {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "instantiation failed");
                false
            }
        }
    }

    /// Instantiate: allocate memory and interpreter if absent and bind exports
    pub fn try_instantiate(&mut self) -> Result<(), ModuleError> {
        if !self.module.is_compiled() {
            return Err(ModuleError::NotCompiled);
        }

        if self.memory.is_none() {
            self.memory = Some(Memory::new(INSTANCE_INITIAL_PAGES, INSTANCE_MAX_PAGES)?);
        }
        if self.vm.is_none() {
            self.vm = Some(WasmVM::new());
        }
        self.exports = FIXED_EXPORTS.to_vec();

        debug!(
            sections = self.module.sections().len(),
            exports = self.exports.len(),
            "module instantiated"
        );
        Ok(())
    }

    /// Whether the instance has memory and an interpreter
    pub fn is_instantiated(&self) -> bool {
        self.memory.is_some() && self.vm.is_some()
    }

    /// Export names in table order
    pub fn exports(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.exports.iter().map(|export| export.name)
    }

    /// Look up an export by name
    pub fn get_export(&self, name: &str) -> Option<&ExportedFunction> {
        self.exports.iter().find(|export| export.name == name)
    }

    /// Invoke an export; `Undefined` for unknown names or before instantiation
    pub fn call_export(&mut self, name: &str, args: &[Value]) -> Value {
        let Some(export) = self.get_export(name).copied() else {
            return Value::Undefined;
        };
        match self.vm.as_mut() {
            Some(vm) => vm.execute_function(export.body, args),
            None => Value::Undefined,
        }
    }

    /// Linear memory, once instantiated
    pub fn memory(&self) -> Option<&Memory> {
        self.memory.as_ref()
    }

    /// Mutable linear memory, once instantiated
    pub fn memory_mut(&mut self) -> Option<&mut Memory> {
        self.memory.as_mut()
    }

    /// The bound interpreter, once instantiated
    pub fn vm(&self) -> Option<&WasmVM> {
        self.vm.as_ref()
    }

    /// The backing module
    pub fn module(&self) -> &Arc<Module> {
        &self.module
    }
}
