//! Registry of compiled native entries
//!
//! Owned by the caller rather than process-global. The check for an existing
//! entry and the insert of a new one happen under the same lock, so two
//! threads asking for the same function compile it once.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::codegen::CompiledEntry;
use crate::error::CodegenResult;

/// Identity of a function whose native code may be cached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FunctionId(pub u32);

impl fmt::Display for FunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fn#{}", self.0)
    }
}

/// Thread-safe map from [`FunctionId`] to its compiled entry
#[derive(Debug, Default)]
pub struct CodeRegistry {
    entries: Mutex<HashMap<FunctionId, Arc<CompiledEntry>>>,
}

impl CodeRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Return the cached entry for `id`, compiling it with `compile` if absent.
    ///
    /// `compile` runs while the lock is held and at most once per id; a
    /// failed compilation leaves the registry unchanged.
    pub fn get_or_compile<F>(&self, id: FunctionId, compile: F) -> CodegenResult<Arc<CompiledEntry>>
    where
        F: FnOnce() -> CodegenResult<CompiledEntry>,
    {
        let mut entries = self.entries.lock();
        if let Some(entry) = entries.get(&id) {
            return Ok(Arc::clone(entry));
        }
        let entry = Arc::new(compile()?);
        debug!(function = %id, name = entry.name(), "registered native entry");
        entries.insert(id, Arc::clone(&entry));
        Ok(entry)
    }

    /// Cached entry for `id`
    pub fn get(&self, id: FunctionId) -> Option<Arc<CompiledEntry>> {
        self.entries.lock().get(&id).cloned()
    }

    /// Whether `id` has native code
    pub fn is_compiled(&self, id: FunctionId) -> bool {
        self.entries.lock().contains_key(&id)
    }

    /// Drop the registry's handle to `id`'s entry
    pub fn remove(&self, id: FunctionId) -> Option<Arc<CompiledEntry>> {
        self.entries.lock().remove(&id)
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether nothing is cached
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
