//! PairRecursionDetector: recursion keyed by (object, paired object).
//!
//! Each identity starts with a single pairing and is promoted to a set of
//! pairings when a re-entrant call arrives with a different partner. Every
//! claim is undone by a drop scope, so the store regains its pre-call shape
//! on return, on error, and on panic.

use crate::context::ExecutionContext;
use crate::guard_store::Claim;
use crate::identity::{Identity, ObjectId};
use crate::nesting::FrameToken;
use log::trace;

struct ClaimScope<'a> {
    cx: &'a ExecutionContext,
    id: ObjectId,
    pair: ObjectId,
    claim: Claim,
    _frame: FrameToken<'a>,
}

impl<'a> Drop for ClaimScope<'a> {
    fn drop(&mut self) {
        let (id, pair, claim) = (self.id, self.pair, self.claim);
        self.cx.with_store(|s| s.release(id, pair, claim));
    }
}

impl ExecutionContext {
    /// Run `body` unless `obj` is already being processed without a pairing
    /// on this context.
    ///
    /// Returns `Ok(true)` when recursion was detected (`body` did not run),
    /// `Ok(false)` when `body` ran to completion, and `Err` with the body's
    /// own error otherwise.
    pub fn detect_recursion<O, E, F>(&self, obj: &O, body: F) -> Result<bool, E>
    where
        O: Identity + ?Sized,
        F: FnOnce() -> Result<(), E>,
    {
        self.detect_recursion_ids(obj.object_id(), ObjectId::UNPAIRED, body)
    }

    /// Like `detect_recursion`, keyed by the pair `(obj, paired)`. Used by
    /// binary traversals such as structural equality.
    pub fn detect_pair_recursion<O, P, E, F>(&self, obj: &O, paired: &P, body: F) -> Result<bool, E>
    where
        O: Identity + ?Sized,
        P: Identity + ?Sized,
        F: FnOnce() -> Result<(), E>,
    {
        self.detect_recursion_ids(obj.object_id(), paired.object_id(), body)
    }

    pub(crate) fn detect_recursion_ids<E, F>(&self, id: ObjectId, pair: ObjectId, body: F) -> Result<bool, E>
    where
        F: FnOnce() -> Result<(), E>,
    {
        let claim = match self.with_store(|s| s.claim(id, pair)) {
            Some(claim) => claim,
            None => {
                trace!("recursion detected on {:?} paired with {:?}", id, pair);
                return Ok(true);
            }
        };
        if let Claim::Promoted(previous) = claim {
            trace!("promoted {:?} from {:?} to multi with {:?}", id, previous, pair);
        }
        let _scope = ClaimScope {
            _frame: self.nesting.enter(),
            cx: self,
            id,
            pair,
            claim,
        };
        body()?;
        Ok(false)
    }
}
