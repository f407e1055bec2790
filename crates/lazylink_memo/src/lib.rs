//! lazylink memoization - cache-or-compute wrappers built from handle
//! combinators.
//!
//! [`memoize`] wraps a raw handle so that each distinct argument reaches
//! the raw body at most once. Results live in a [`CacheTable`] owned by one
//! `(OwnerType, Selector)` slot of a [`CacheTableStore`]; two operations
//! never share a table, even when their names collide.
//!
//! Recursive bodies must call their *memoized* identity. They do so through
//! a [`Forward`] cell or through a call site's dynamic invoker, linked to
//! the memoized handle before first use.
//!
//! A result of `Null` is indistinguishable from a missing entry: it is
//! stored, but the operation is recomputed on every call.

mod errors;
mod forward;
mod memoize;
mod resolver;
mod store;

pub use errors::LinkError;
pub use forward::Forward;
pub use memoize::{memoize, memoize_in};
pub use resolver::MemoizingResolver;
pub use store::{CacheTable, CacheTableStore};
