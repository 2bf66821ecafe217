//! The `WebAssembly` namespace: compile, validate, instantiate
//!
//! Host-facing wrappers over [`Module`], [`Instance`] and [`Memory`].
//! Failures are signalled through the [`HostContext`] and the call returns
//! `None`; callers check the context for the error.

use std::sync::Arc;

use core_types::{HostContext, Value};

use crate::instance::Instance;
use crate::memory::Memory;
use crate::module::Module;

/// Page count used when the descriptor is not a number
const DEFAULT_MEMORY_PAGES: u32 = 1;

/// Module lifecycle entry points for the host.
///
/// # Examples
///
/// ```
/// use core_types::{HostContext, Value};
/// use wasm_runtime::WebAssembly;
///
/// let bytes = [0x00, 0x61, 0x73, 0x6D, 0x01, 0x00, 0x00, 0x00];
/// assert!(WebAssembly::validate(&bytes));
///
/// let mut ctx = HostContext::new();
/// let mut instance = WebAssembly::instantiate(&mut ctx, &bytes).unwrap();
/// assert_eq!(instance.call_export("const42", &[]), Value::Number(42.0));
///
/// assert!(WebAssembly::compile(&mut ctx, &[0x00]).is_none());
/// assert!(ctx.has_exception());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct WebAssembly;

impl WebAssembly {
    /// Compile a module binary
    pub fn compile(ctx: &mut HostContext, bytes: &[u8]) -> Option<Module> {
        let mut module = Module::new(bytes);
        match module.try_compile() {
            Ok(()) => Some(module),
            Err(err) => {
                ctx.throw_error(format!("WebAssembly.Module compilation failed: {}", err));
                None
            }
        }
    }

    /// Whether the bytes compile as a module; never signals an error
    pub fn validate(bytes: &[u8]) -> bool {
        Module::new(bytes).try_compile().is_ok()
    }

    /// Compile and instantiate in one step
    pub fn instantiate(ctx: &mut HostContext, bytes: &[u8]) -> Option<Instance> {
        let module = Self::compile(ctx, bytes)?;
        let mut instance = Instance::new(Arc::new(module));
        match instance.try_instantiate() {
            Ok(()) => Some(instance),
            Err(err) => {
                ctx.throw_error(format!("WebAssembly.Instance instantiation failed: {}", err));
                None
            }
        }
    }

    /// Construct a linear memory from host arguments.
    ///
    /// The first argument is the descriptor; a number is taken as the
    /// initial page count, anything else means one page. A missing
    /// descriptor is a type error.
    pub fn memory(ctx: &mut HostContext, args: &[Value]) -> Option<Memory> {
        let Some(descriptor) = args.first() else {
            ctx.throw_type_error("WebAssembly.Memory constructor requires a descriptor argument");
            return None;
        };

        let initial = if descriptor.is_number() {
            descriptor.to_number() as u32
        } else {
            DEFAULT_MEMORY_PAGES
        };

        match Memory::with_initial(initial) {
            Ok(memory) => Some(memory),
            Err(err) => {
                ctx.throw_error(format!("WebAssembly.Memory allocation failed: {}", err));
                None
            }
        }
    }
}
