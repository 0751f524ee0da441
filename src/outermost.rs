//! OutermostRecursionDetector: one recursion hit anywhere in a traversal
//! makes the whole traversal report recursion.
//!
//! The first call on a context sets the outermost marker and becomes the
//! boundary. Nested calls delegate to the pair detector; when one of them
//! finds recursion it returns `Err(Unwind::Recursion(_))`, which bodies pass
//! up with `?` until the boundary turns it into `Outcome::Recursion`. No
//! intermediate frame runs its own continuation on the way up.

use crate::context::ExecutionContext;
use crate::identity::{Identity, ObjectId};
use crate::nesting::FrameToken;
use core::fmt;
use log::{debug, trace};
use thiserror::Error;

/// Result of an outermost-guarded call.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// Recursion was found at or below this frame. Only the boundary frame
    /// returns this.
    Recursion,
    /// Nested frame: no recursion at this level; the body ran.
    Clean,
    /// Boundary frame: the traversal ran to completion without any nested
    /// frame reporting recursion.
    Finished,
}

impl Outcome {
    pub fn is_recursion(self) -> bool {
        matches!(self, Outcome::Recursion)
    }
}

/// Short-circuit payload. Only this crate can create one, so a body can
/// forward it but never forge it.
#[derive(Debug, Eq, PartialEq)]
pub struct InnerRecursion {
    _priv: (),
}

impl fmt::Display for InnerRecursion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("recursion detected in a nested traversal")
    }
}

/// Error channel of outermost-guarded bodies: either the body's own error or
/// the short-circuit signal heading for the boundary frame.
///
/// Nested `Unwind` values pass through `?` unchanged; bodies raise their own
/// errors with `map_err(Unwind::Error)?`.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum Unwind<E> {
    #[error("{0}")]
    Error(E),
    #[error("{0}")]
    Recursion(InnerRecursion),
}

impl<E> Unwind<E> {
    /// The body's error, or the short-circuit signal if that is what this is.
    pub fn into_error(self) -> Result<E, InnerRecursion> {
        match self {
            Unwind::Error(e) => Ok(e),
            Unwind::Recursion(signal) => Err(signal),
        }
    }

    pub fn is_recursion(&self) -> bool {
        matches!(self, Unwind::Recursion(_))
    }
}

/// Clears the outermost marker when the boundary frame exits.
struct BoundaryScope<'a> {
    cx: &'a ExecutionContext,
    _frame: FrameToken<'a>,
}

impl<'a> Drop for BoundaryScope<'a> {
    fn drop(&mut self) {
        self.cx.with_store(|s| {
            s.set_outermost(false);
        });
    }
}

impl ExecutionContext {
    /// Outermost-guarded form of `detect_recursion`.
    ///
    /// Bodies must forward `Unwind` errors from nested calls with `?` (or
    /// otherwise return them unchanged) for the short-circuit to reach the
    /// boundary frame.
    pub fn detect_outermost_recursion<O, E, F>(&self, obj: &O, body: F) -> Result<Outcome, Unwind<E>>
    where
        O: Identity + ?Sized,
        F: FnOnce() -> Result<(), Unwind<E>>,
    {
        self.detect_outermost_ids(obj.object_id(), ObjectId::UNPAIRED, body)
    }

    /// Outermost-guarded form of `detect_pair_recursion`.
    pub fn detect_outermost_pair_recursion<O, P, E, F>(
        &self,
        obj: &O,
        paired: &P,
        body: F,
    ) -> Result<Outcome, Unwind<E>>
    where
        O: Identity + ?Sized,
        P: Identity + ?Sized,
        F: FnOnce() -> Result<(), Unwind<E>>,
    {
        self.detect_outermost_ids(obj.object_id(), paired.object_id(), body)
    }

    fn detect_outermost_ids<E, F>(&self, id: ObjectId, pair: ObjectId, body: F) -> Result<Outcome, Unwind<E>>
    where
        F: FnOnce() -> Result<(), Unwind<E>>,
    {
        if self.outermost_active() {
            if self.detect_recursion_ids(id, pair, body)? {
                trace!("short-circuiting traversal at {:?}", id);
                return Err(Unwind::Recursion(InnerRecursion { _priv: () }));
            }
            return Ok(Outcome::Clean);
        }

        let _boundary = BoundaryScope {
            _frame: self.nesting.enter(),
            cx: self,
        };
        self.with_store(|s| {
            s.set_outermost(true);
        });
        match self.detect_recursion_ids(id, pair, body) {
            // A hit on the boundary's own pairing belongs to an enclosing
            // non-outermost guard, not to this traversal.
            Ok(_) => Ok(Outcome::Finished),
            Err(Unwind::Recursion(_)) => {
                debug!("traversal rooted at {:?} collapsed on nested recursion", id);
                Ok(Outcome::Recursion)
            }
            Err(e) => Err(e),
        }
    }
}
