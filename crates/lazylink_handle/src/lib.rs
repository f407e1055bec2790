//! lazylink handles - typed callables and their composition algebra.
//!
//! A [`MethodHandle`] is a reference-counted callable over [`Value`]s that
//! carries its [`Signature`]. Handles are assembled once from small
//! primitives (see [`combinators`]) and then invoked many times without
//! further allocation in the composition itself.
//!
//! # Checking
//!
//! Signatures are verified when handles are composed, so composed handles
//! call their parts through [`MethodHandle::invoke_unchecked`]. Only the
//! outermost boundary ([`MethodHandle::invoke`]) validates arguments and
//! the returned value.
//!
//! [`Value`]: lazylink_ir::Value
//! [`Signature`]: lazylink_ir::Signature

pub mod combinators;
mod errors;
mod handle;

pub use errors::{CombinatorError, InvocationError};
pub use handle::{InvokeResult, MethodHandle, VirtualMethod};
