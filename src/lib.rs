//! recursion-guard: per-execution-context recursion detection for
//! traversals over possibly cyclic object graphs (structural equality,
//! hashing, `inspect`-style printing).
//!
//! Internal Design:
//!
//! Summary
//! - Goal: let a recursive traversal ask "am I already processing this
//!   object (optionally paired with that one) on this execution context?"
//!   and skip re-entry when the answer is yes.
//! - Layers:
//!   - GuardStore: map from object identity to a `GuardValue`
//!     (`Single(pair)` or `Multi(pairs)`) plus the outermost marker. Pure
//!     state; it never runs user code.
//!   - ExecutionContext: owns one GuardStore and exposes the guard
//!     operations. Three surfaces sit on top of it:
//!     - simple guard (`with_guard`, `acquire`, `release`, `is_guarding`),
//!     - pair detector (`detect_recursion`, `detect_pair_recursion`),
//!     - outermost detector (`detect_outermost_recursion`,
//!       `detect_outermost_pair_recursion`).
//!   - `current`: a lazily created thread-local context and free functions
//!     for the one-thread-one-context case.
//!   - ContextRegistry: handle-indexed contexts for runtimes that run
//!     several execution contexts on one OS thread.
//!
//! Constraints
//! - Single-threaded per context: `ExecutionContext` is `!Send`/`!Sync`.
//!   Contexts share nothing, so there is no locking.
//! - The store after a guarded call returns is identical to the store
//!   before it, whether the body returned, failed, short-circuited or
//!   panicked. Every mutation is undone by a drop scope.
//! - Guard frames nest strictly with the call stack; debug builds assert
//!   this (see `nesting`).
//! - The store is never borrowed while a body runs, so bodies may call back
//!   into any guard operation on any context.
//!
//! Promotion
//! - A first call on an identity stores `Single(pair)`. A re-entrant call
//!   with a different pair promotes it to `Multi({previous, pair})` and, on
//!   exit, restores exactly `Single(previous)`. Further pairings join the
//!   `Multi` set and remove themselves on exit; the `Multi` entry is not
//!   demoted while its promoting frame is live.
//!
//! Short-circuit
//! - Outermost-guarded bodies return `Result<(), Unwind<E>>`. A nested
//!   frame that detects recursion returns `Err(Unwind::Recursion(_))`;
//!   bodies forward it with `?`, and the boundary frame converts it into
//!   `Outcome::Recursion`. The payload type cannot be constructed outside
//!   this crate.
//!
//! Notes and non-goals
//! - No thread scheduling, priorities, or cross-context visibility.
//! - "Recursion detected" is a return value, never an error.
//! - Logging goes through the `log` facade at `trace`/`debug` level; the
//!   crate never installs a logger.

mod context;
pub mod current;
mod guard_store;
mod identity;
mod nesting;
mod outermost;
mod pair;
mod registry;
mod simple_guard;

// Public surface
pub use context::ExecutionContext;
pub use guard_store::{GuardStore, GuardValue};
pub use identity::{Identity, ObjectId};
pub use outermost::{InnerRecursion, Outcome, Unwind};
pub use registry::{ContextKey, ContextRegistry, RegistryError};
