//! ExecutionContext: the unit guard state is scoped to.
//!
//! A context owns exactly one `GuardStore`. The guard operations live in
//! `simple_guard`, `pair` and `outermost` as inherent methods; this module
//! only holds the state they share and the store accessors.

use crate::guard_store::{GuardStore, GuardValue};
use crate::identity::ObjectId;
use crate::nesting::DebugNesting;
use core::cell::RefCell;

/// Guard state for one execution context (an OS thread, fiber, or green
/// thread). `!Send + !Sync`: a context is only ever driven by its owner.
#[derive(Debug, Default)]
pub struct ExecutionContext {
    // Borrows never outlive a single store operation; bodies run unborrowed.
    store: RefCell<GuardStore>,
    pub(crate) nesting: DebugNesting,
}

impl ExecutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context whose store is pre-sized for `capacity` concurrently guarded
    /// identities.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            store: RefCell::new(GuardStore::with_capacity(capacity)),
            nesting: DebugNesting::new(),
        }
    }

    /// Current entry for `id`, cloned out of the store.
    pub fn entry(&self, id: ObjectId) -> Option<GuardValue> {
        self.store.borrow().get(id).cloned()
    }

    /// Copy of the whole store, for comparing before/after states.
    pub fn snapshot(&self) -> GuardStore {
        self.store.borrow().clone()
    }

    /// Number of identities with a live entry.
    pub fn guarded_len(&self) -> usize {
        self.store.borrow().len()
    }

    /// Whether an outermost-guarded call is active on this context.
    pub fn outermost_active(&self) -> bool {
        self.store.borrow().outermost_active()
    }

    #[inline]
    pub(crate) fn with_store<R>(&self, f: impl FnOnce(&mut GuardStore) -> R) -> R {
        f(&mut self.store.borrow_mut())
    }
}
