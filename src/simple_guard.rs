//! SimpleGuard: unpaired "in progress" marks.

use crate::context::ExecutionContext;
use crate::guard_store::GuardValue;
use crate::identity::{Identity, ObjectId};
use crate::nesting::FrameToken;

/// Puts back the entry a `with_guard` call replaced, on every exit path.
struct MarkScope<'a> {
    cx: &'a ExecutionContext,
    id: ObjectId,
    previous: Option<GuardValue>,
    _frame: FrameToken<'a>,
}

impl<'a> Drop for MarkScope<'a> {
    fn drop(&mut self) {
        let previous = self.previous.take();
        self.cx.with_store(|s| s.restore(self.id, previous));
    }
}

impl ExecutionContext {
    /// Mark `obj` as in progress. Re-marking is harmless.
    pub fn acquire<O: Identity + ?Sized>(&self, obj: &O) {
        let id = obj.object_id();
        self.with_store(|s| {
            s.mark(id);
        });
    }

    /// Remove any mark on `obj`.
    pub fn release<O: Identity + ?Sized>(&self, obj: &O) {
        let id = obj.object_id();
        self.with_store(|s| s.unmark(id));
    }

    /// Whether `obj` has any live guard entry on this context, from this
    /// guard or from an in-flight detector call.
    pub fn is_guarding<O: Identity + ?Sized>(&self, obj: &O) -> bool {
        let id = obj.object_id();
        self.with_store(|s| s.contains(id))
    }

    /// Run `body` with `obj` marked, then put back whatever entry `obj` had
    /// before, whether `body` returns or unwinds.
    pub fn with_guard<O, R, F>(&self, obj: &O, body: F) -> R
    where
        O: Identity + ?Sized,
        F: FnOnce() -> R,
    {
        let id = obj.object_id();
        let _scope = MarkScope {
            _frame: self.nesting.enter(),
            previous: self.with_store(|s| s.mark(id)),
            cx: self,
            id,
        };
        body()
    }
}
