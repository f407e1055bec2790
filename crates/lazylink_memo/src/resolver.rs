//! A resolver that binds call sites to memoized targets.

use std::rc::Rc;

use lazylink_bind::{Lookup, ResolutionError, Resolver};
use lazylink_handle::MethodHandle;
use lazylink_ir::{OperationDescriptor, OwnerType, Value};
use tracing::debug;

use crate::{memoize, CacheTableStore};

/// Resolves a call site to the memoized form of a static method.
///
/// The target is `owner::name` with the site's exact signature, where
/// `owner` defaults to the lookup's caller and `name` to the operation
/// name. A `Str` first static argument overrides the target name, so a
/// site `fib` can bind to a raw body declared as `fib_raw`.
///
/// The cache table is keyed by the target's owner and the *operation's*
/// selector.
pub struct MemoizingResolver {
    store: Rc<CacheTableStore>,
    owner: Option<OwnerType>,
}

impl MemoizingResolver {
    pub fn new(store: Rc<CacheTableStore>) -> Self {
        MemoizingResolver { store, owner: None }
    }

    /// Resolver backed by this thread's shared store.
    pub fn global() -> Self {
        Self::new(CacheTableStore::global())
    }

    /// Look targets up on `owner` instead of the caller.
    #[must_use]
    pub fn on(mut self, owner: OwnerType) -> Self {
        self.owner = Some(owner);
        self
    }
}

impl Resolver for MemoizingResolver {
    fn resolve(
        &self,
        lookup: &Lookup,
        descriptor: &OperationDescriptor,
        extra_args: &[Value],
    ) -> Result<MethodHandle, ResolutionError> {
        let owner = self.owner.unwrap_or_else(|| lookup.caller());
        let name = extra_args
            .first()
            .and_then(Value::as_str)
            .unwrap_or_else(|| descriptor.name());
        let raw = lookup.find_static(owner, name, descriptor.signature())?;
        let table = self.store.table_for(owner, &descriptor.selector());
        debug!(%owner, method = name, entries = table.len(), "memoizing target");
        Ok(memoize(&raw, &table)?)
    }
}
