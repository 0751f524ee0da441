//! Guard operations on the calling thread's execution context.
//!
//! The context is created lazily on first use and dropped when the thread
//! exits. Each function here is a thin forward to the `ExecutionContext`
//! method of the same name.
//!
//! Once the context has been destroyed during thread exit, every function
//! here except `try_with_current` panics. Code that can run from another
//! thread-local's destructor should use `try_with_current`.

use crate::context::ExecutionContext;
use crate::identity::Identity;
use crate::outermost::{Outcome, Unwind};
use std::thread::AccessError;

thread_local! {
    static CURRENT: ExecutionContext = ExecutionContext::new();
}

/// Run `f` with this thread's execution context. Calls may nest.
///
/// # Panics
///
/// If the context was already destroyed by thread exit.
pub fn with_current<R>(f: impl FnOnce(&ExecutionContext) -> R) -> R {
    CURRENT.with(f)
}

/// Like `with_current`, but returns `AccessError` instead of panicking once
/// the context has been destroyed by thread exit.
pub fn try_with_current<R>(f: impl FnOnce(&ExecutionContext) -> R) -> Result<R, AccessError> {
    CURRENT.try_with(f)
}

pub fn detect_recursion<O, E, F>(obj: &O, body: F) -> Result<bool, E>
where
    O: Identity + ?Sized,
    F: FnOnce() -> Result<(), E>,
{
    with_current(|cx| cx.detect_recursion(obj, body))
}

pub fn detect_pair_recursion<O, P, E, F>(obj: &O, paired: &P, body: F) -> Result<bool, E>
where
    O: Identity + ?Sized,
    P: Identity + ?Sized,
    F: FnOnce() -> Result<(), E>,
{
    with_current(|cx| cx.detect_pair_recursion(obj, paired, body))
}

pub fn detect_outermost_recursion<O, E, F>(obj: &O, body: F) -> Result<Outcome, Unwind<E>>
where
    O: Identity + ?Sized,
    F: FnOnce() -> Result<(), Unwind<E>>,
{
    with_current(|cx| cx.detect_outermost_recursion(obj, body))
}

pub fn detect_outermost_pair_recursion<O, P, E, F>(obj: &O, paired: &P, body: F) -> Result<Outcome, Unwind<E>>
where
    O: Identity + ?Sized,
    P: Identity + ?Sized,
    F: FnOnce() -> Result<(), Unwind<E>>,
{
    with_current(|cx| cx.detect_outermost_pair_recursion(obj, paired, body))
}

pub fn with_guard<O, R, F>(obj: &O, body: F) -> R
where
    O: Identity + ?Sized,
    F: FnOnce() -> R,
{
    with_current(|cx| cx.with_guard(obj, body))
}

pub fn is_guarding<O: Identity + ?Sized>(obj: &O) -> bool {
    with_current(|cx| cx.is_guarding(obj))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::ObjectId;
    use core::convert::Infallible;

    /// Invariant: each OS thread sees only its own guards.
    #[test]
    fn threads_have_separate_contexts() {
        let obj = ObjectId::from_raw(77);
        with_guard(&obj, || {
            assert!(is_guarding(&obj));
            let other = std::thread::spawn(move || is_guarding(&obj)).join().unwrap();
            assert!(!other);
        });
        assert!(!is_guarding(&obj));
    }

    /// Invariant: while the thread is live, `try_with_current` sees the same
    /// context as `with_current`.
    #[test]
    fn try_with_current_sees_live_context() {
        let obj = ObjectId::from_raw(79);
        with_guard(&obj, || {
            assert_eq!(try_with_current(|cx| cx.is_guarding(&obj)), Ok(true));
        });
        assert_eq!(try_with_current(|cx| cx.guarded_len()), Ok(0));
    }

    /// Invariant: the free functions nest through the thread-local context.
    #[test]
    fn nested_free_function_calls() {
        let obj = ObjectId::from_raw(78);
        let r = detect_recursion(&obj, || {
            let inner = detect_recursion(&obj, || Ok::<(), Infallible>(()))?;
            assert!(inner);
            Ok::<(), Infallible>(())
        });
        assert_eq!(r, Ok(false));
        assert!(!is_guarding(&obj));
    }
}
