//! GuardStore: per-context table of in-flight guard entries.
//!
//! The store only records state; running bodies and undoing claims on every
//! exit path is the job of the callers in `simple_guard`, `pair` and
//! `outermost`.

use crate::identity::ObjectId;
use hashbrown::{HashMap, HashSet};

/// Live guard entry for one object identity.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum GuardValue {
    /// In flight with exactly one pairing.
    Single(ObjectId),
    /// In flight re-entrantly with several pairings. May be empty after the
    /// pairings that joined it have exited; it is never demoted.
    Multi(HashSet<ObjectId>),
}

impl GuardValue {
    /// Whether `pair` is one of the in-flight pairings.
    pub fn holds(&self, pair: ObjectId) -> bool {
        match self {
            GuardValue::Single(p) => *p == pair,
            GuardValue::Multi(set) => set.contains(&pair),
        }
    }
}

/// How a successful claim changed the store; handed back to `release`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Claim {
    /// The identity had no entry; it now holds `Single(pair)`.
    Fresh,
    /// The identity held `Multi`; `pair` was added to the set.
    Joined,
    /// The identity held `Single(previous)`; it was promoted to `Multi`.
    Promoted(ObjectId),
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct GuardStore {
    entries: HashMap<ObjectId, GuardValue>,
    outermost: bool,
}

impl GuardStore {
    /// Empty store. Does not allocate until the first entry is inserted.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
            outermost: false,
        }
    }

    pub fn get(&self, id: ObjectId) -> Option<&GuardValue> {
        self.entries.get(&id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether an outermost-guarded call is active.
    pub fn outermost_active(&self) -> bool {
        self.outermost
    }

    /// Set the outermost marker, returning its previous state.
    pub(crate) fn set_outermost(&mut self, active: bool) -> bool {
        core::mem::replace(&mut self.outermost, active)
    }

    /// Record `(id, pair)` as in flight. `None` means the combination is
    /// already in flight and nothing was changed.
    pub(crate) fn claim(&mut self, id: ObjectId, pair: ObjectId) -> Option<Claim> {
        match self.entries.get_mut(&id) {
            None => {
                self.entries.insert(id, GuardValue::Single(pair));
                Some(Claim::Fresh)
            }
            Some(GuardValue::Multi(set)) => {
                if set.insert(pair) {
                    Some(Claim::Joined)
                } else {
                    None
                }
            }
            Some(GuardValue::Single(previous)) => {
                let previous = *previous;
                if previous == pair {
                    return None;
                }
                let set: HashSet<ObjectId> = [previous, pair].into_iter().collect();
                self.entries.insert(id, GuardValue::Multi(set));
                Some(Claim::Promoted(previous))
            }
        }
    }

    /// Undo a claim made by `claim(id, pair)`.
    ///
    /// The body may have replaced or removed the entry through `acquire` or
    /// `release`. A fresh claim still removes whatever is there; a joined
    /// claim only touches a `Multi`, and is a no-op on any other shape.
    pub(crate) fn release(&mut self, id: ObjectId, pair: ObjectId, claim: Claim) {
        match claim {
            Claim::Fresh => {
                self.entries.remove(&id);
            }
            Claim::Joined => {
                if let Some(GuardValue::Multi(set)) = self.entries.get_mut(&id) {
                    set.remove(&pair);
                }
            }
            Claim::Promoted(previous) => {
                self.entries.insert(id, GuardValue::Single(previous));
            }
        }
    }

    /// Mark `id` for the simple guard, returning the entry it replaced.
    pub(crate) fn mark(&mut self, id: ObjectId) -> Option<GuardValue> {
        self.entries.insert(id, GuardValue::Single(ObjectId::GUARD_MARK))
    }

    pub(crate) fn unmark(&mut self, id: ObjectId) {
        self.entries.remove(&id);
    }

    /// Put back the entry `id` had before a `mark`.
    pub(crate) fn restore(&mut self, id: ObjectId, previous: Option<GuardValue>) {
        match previous {
            Some(value) => {
                self.entries.insert(id, value);
            }
            None => {
                self.entries.remove(&id);
            }
        }
    }
}
