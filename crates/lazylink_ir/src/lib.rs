//! lazylink IR - descriptors, types and values.
//!
//! This crate holds the plain data every other lazylink crate speaks:
//! - `Type` and `Signature` describe the shape of a callable
//! - `Value` is the dynamic argument/result representation
//! - `OperationDescriptor` and `Selector` identify a call site
//! - `OwnerType` scopes lookups and caches to a declaring type
//! - `ResolverDescriptor` says which resolver binds a call site, and with
//!   which static arguments
//!
//! Nothing here executes code. Everything is `Clone + Eq + Hash + Debug`
//! so it can key maps and appear in error messages.

mod descriptor;
mod owner;
mod signature;
mod ty;
mod value;

pub use descriptor::{OperationDescriptor, ResolverDescriptor, ResolverSignature, Selector};
pub use owner::OwnerType;
pub use signature::Signature;
pub use ty::Type;
pub use value::Value;

/// Re-exported so callers can build `Value::BigInt` without naming the crate.
pub use num_bigint::BigInt;
