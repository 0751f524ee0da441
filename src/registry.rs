//! ContextRegistry: explicit, handle-indexed execution contexts.
//!
//! For runtimes that multiplex several execution contexts (fibers, green
//! threads) on one OS thread. Handles are generational, so a handle to a
//! disposed context never resolves to a context spawned later in the same
//! slot.

use crate::context::ExecutionContext;
use log::debug;
use slotmap::{new_key_type, SlotMap};
use thiserror::Error;

new_key_type! {
    /// Handle to one execution context in a `ContextRegistry`.
    pub struct ContextKey;
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum RegistryError {
    #[error("unknown or disposed execution context {0:?}")]
    UnknownContext(ContextKey),
}

#[derive(Debug, Default)]
pub struct ContextRegistry {
    contexts: SlotMap<ContextKey, ExecutionContext>,
}

impl ContextRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            contexts: SlotMap::with_capacity_and_key(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    /// Create a context with an empty guard store.
    pub fn spawn(&mut self) -> ContextKey {
        let key = self.contexts.insert(ExecutionContext::new());
        debug!("spawned execution context {:?}", key);
        key
    }

    pub fn contains(&self, key: ContextKey) -> bool {
        self.contexts.contains_key(key)
    }

    pub fn get(&self, key: ContextKey) -> Result<&ExecutionContext, RegistryError> {
        self.contexts.get(key).ok_or(RegistryError::UnknownContext(key))
    }

    /// Drop a context and its guard store, including any guards still held
    /// through `acquire`. Contexts can only be disposed while no guarded call
    /// borrows them.
    pub fn dispose(&mut self, key: ContextKey) -> Result<(), RegistryError> {
        match self.contexts.remove(key) {
            Some(cx) => {
                debug!(
                    "disposed execution context {:?} ({} guard entries dropped)",
                    key,
                    cx.guarded_len()
                );
                Ok(())
            }
            None => Err(RegistryError::UnknownContext(key)),
        }
    }
}
