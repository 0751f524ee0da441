//! Debug-only nesting tracker.
//!
//! Guard frames on one execution context must be released in the reverse
//! order they were acquired. In debug builds every frame records its depth
//! and asserts on drop that it is the innermost live frame. In release
//! builds this compiles to a zero-cost no-op.

#[cfg(debug_assertions)]
use core::cell::Cell;
use core::marker::PhantomData;

/// Per-context frame depth tracker.
#[derive(Debug)]
pub(crate) struct DebugNesting {
    #[cfg(debug_assertions)]
    depth: Cell<u32>,
    // Keep !Send + !Sync; a context is only driven from its own thread.
    _nosend: PhantomData<*mut ()>,
}

impl DebugNesting {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            depth: Cell::new(0),
            _nosend: PhantomData,
        }
    }

    /// Open a frame. The returned token must be dropped before any frame
    /// opened earlier on the same tracker.
    #[inline]
    pub(crate) fn enter(&self) -> FrameToken<'_> {
        #[cfg(debug_assertions)]
        {
            let d = self.depth.get() + 1;
            self.depth.set(d);
            FrameToken {
                owner: self,
                depth: d,
            }
        }

        #[cfg(not(debug_assertions))]
        {
            FrameToken { _z: PhantomData }
        }
    }

    /// Number of open frames; always zero in release builds.
    #[cfg(test)]
    pub(crate) fn depth(&self) -> u32 {
        #[cfg(debug_assertions)]
        {
            self.depth.get()
        }
        #[cfg(not(debug_assertions))]
        {
            0
        }
    }
}

impl Default for DebugNesting {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII frame returned by `DebugNesting::enter`.
pub(crate) struct FrameToken<'a> {
    #[cfg(debug_assertions)]
    owner: &'a DebugNesting,
    #[cfg(debug_assertions)]
    depth: u32,
    #[cfg(not(debug_assertions))]
    _z: PhantomData<&'a ()>,
}

impl<'a> Drop for FrameToken<'a> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        {
            let d = self.owner.depth.get();
            // Skip the check while already panicking so the first panic surfaces.
            if !std::thread::panicking() {
                assert_eq!(d, self.depth, "guard frame released out of order");
            }
            self.owner.depth.set(d.saturating_sub(1));
        }
    }
}
