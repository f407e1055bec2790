//! lazylink call sites - resolve an operation once, on first use.
//!
//! A caller describes an operation ([`OperationDescriptor`]) and the
//! resolver that should bind it ([`ResolverDescriptor`]).
//! [`CallSiteRegistry::bind`] finds the resolver immediately but does not
//! run it. The first [`CallSite::invoke`] runs the resolver, checks the
//! handle it returns and stores it for the lifetime of the site. Every later
//! call goes straight to the stored handle.
//!
//! Resolution failure is terminal: the site replays the same error to every
//! later caller. Binding again through the registry yields a fresh site.
//!
//! # Threading
//!
//! Sites and member tables use `Rc`/`RefCell` and are `!Send`. Concurrent
//! use is not supported.
//!
//! [`OperationDescriptor`]: lazylink_ir::OperationDescriptor
//! [`ResolverDescriptor`]: lazylink_ir::ResolverDescriptor

pub mod adapter;
mod errors;
mod lookup;
mod registry;
mod resolver;
mod site;
pub mod stack;

pub use adapter::{ArgList, FromValue, IntoValue, TypedCallSite};
pub use errors::{CallError, ResolutionError};
pub use lookup::{Access, Lookup, MemberTable, Visibility};
pub use registry::CallSiteRegistry;
pub use resolver::{fixed, from_fn, FixedResolver, Resolver};
pub use site::{CallSite, SiteState};
