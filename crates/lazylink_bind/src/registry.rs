//! Binding operations to call sites.

use std::cell::RefCell;
use std::rc::Rc;

use lazylink_ir::{OperationDescriptor, ResolverDescriptor, ResolverSignature, Value};
use tracing::debug;

use crate::{CallSite, Lookup, ResolutionError, Resolver};

/// Creates and owns the call sites declared by one caller.
#[derive(Debug)]
pub struct CallSiteRegistry {
    lookup: Lookup,
    sites: RefCell<Vec<Rc<CallSite>>>,
}

impl CallSiteRegistry {
    /// Registry whose sites resolve with `lookup`'s identity and access.
    pub fn new(lookup: Lookup) -> Self {
        CallSiteRegistry {
            lookup,
            sites: RefCell::new(Vec::new()),
        }
    }

    #[inline]
    pub fn lookup(&self) -> &Lookup {
        &self.lookup
    }

    /// Declare a call site for `descriptor`, resolved by `resolver`.
    ///
    /// The resolver is located and its static arguments checked now; it
    /// runs on the site's first invocation. Binding the same descriptor
    /// twice yields two independent sites.
    pub fn bind(
        &self,
        descriptor: OperationDescriptor,
        resolver: ResolverDescriptor,
    ) -> Result<Rc<CallSite>, ResolutionError> {
        let target = self.lookup.find_resolver(resolver.owner(), resolver.name())?;
        check_resolver_shape(target.as_ref(), &resolver)?;

        debug!(site = %descriptor, resolver = %resolver, "binding call site");
        let site = Rc::new(CallSite::new(
            descriptor,
            resolver,
            target,
            self.lookup.clone(),
        ));
        self.sites.borrow_mut().push(Rc::clone(&site));
        Ok(site)
    }

    /// Number of sites bound so far.
    pub fn len(&self) -> usize {
        self.sites.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.borrow().is_empty()
    }

    /// Number of sites whose resolver has succeeded.
    pub fn resolved_count(&self) -> usize {
        self.sites
            .borrow()
            .iter()
            .filter(|site| site.is_resolved())
            .count()
    }

    /// All sites bound so far, in binding order.
    pub fn sites(&self) -> Vec<Rc<CallSite>> {
        self.sites.borrow().clone()
    }
}

/// The descriptor must name the resolver's declared shape (a variadic
/// resolver takes anything) and its arguments must fit that shape.
fn check_resolver_shape(
    resolver: &dyn Resolver,
    descriptor: &ResolverDescriptor,
) -> Result<(), ResolutionError> {
    let declared = resolver.signature();
    let requested = descriptor.signature();
    if declared != ResolverSignature::Variadic && &declared != requested {
        return Err(ResolutionError::ResolverSignatureMismatch {
            resolver: descriptor.to_string(),
            expected: declared,
            found: requested.to_string(),
        });
    }
    let args = descriptor.extra_args();
    if !(declared.accepts(args) && requested.accepts(args)) {
        return Err(ResolutionError::ResolverSignatureMismatch {
            resolver: descriptor.to_string(),
            expected: declared,
            found: describe_args(args),
        });
    }
    Ok(())
}

fn describe_args(args: &[Value]) -> String {
    let names: Vec<_> = args.iter().map(Value::type_name).collect();
    format!("arguments ({})", names.join(","))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests;
