//! Lazily resolved call sites.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use lazylink_handle::{InvocationError, MethodHandle};
use lazylink_ir::{OperationDescriptor, ResolverDescriptor, Value};
use tracing::{debug, warn};

use crate::stack::ensure_sufficient_stack;
use crate::{CallError, Lookup, ResolutionError, Resolver};

/// Resolution state of a [`CallSite`].
///
/// `Resolved` and `Failed` are terminal.
#[derive(Clone, Debug)]
pub enum SiteState {
    Unresolved,
    /// The resolver is running. Reaching the site again in this state means
    /// the resolver invoked its own site.
    Resolving,
    Resolved(MethodHandle),
    Failed(ResolutionError),
}

/// One operation bound, at most once, to a concrete handle.
///
/// Created by [`CallSiteRegistry::bind`](crate::CallSiteRegistry::bind).
pub struct CallSite {
    descriptor: OperationDescriptor,
    resolver_descriptor: ResolverDescriptor,
    resolver: Rc<dyn Resolver>,
    lookup: Lookup,
    state: RefCell<SiteState>,
}

impl CallSite {
    pub(crate) fn new(
        descriptor: OperationDescriptor,
        resolver_descriptor: ResolverDescriptor,
        resolver: Rc<dyn Resolver>,
        lookup: Lookup,
    ) -> Self {
        CallSite {
            descriptor,
            resolver_descriptor,
            resolver,
            lookup,
            state: RefCell::new(SiteState::Unresolved),
        }
    }

    #[inline]
    pub fn descriptor(&self) -> &OperationDescriptor {
        &self.descriptor
    }

    #[inline]
    pub fn resolver_descriptor(&self) -> &ResolverDescriptor {
        &self.resolver_descriptor
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SiteState {
        self.state.borrow().clone()
    }

    pub fn is_resolved(&self) -> bool {
        matches!(*self.state.borrow(), SiteState::Resolved(_))
    }

    /// Invoke the operation, resolving the site first if needed.
    pub fn invoke(&self, args: &[Value]) -> Result<Value, CallError> {
        let target = self.target()?;
        ensure_sufficient_stack(|| target.invoke(args)).map_err(CallError::from)
    }

    /// The bound handle, running the resolver on first use.
    ///
    /// The handle is cloned out of the state cell so that recursive calls
    /// through the site never observe an outstanding borrow.
    pub fn target(&self) -> Result<MethodHandle, ResolutionError> {
        match &*self.state.borrow() {
            SiteState::Resolved(handle) => return Ok(handle.clone()),
            SiteState::Failed(error) => return Err(error.clone()),
            SiteState::Resolving => {
                return Err(ResolutionError::RecursiveResolution {
                    site: self.descriptor.to_string(),
                })
            }
            SiteState::Unresolved => {}
        }

        self.state.replace(SiteState::Resolving);
        match self.resolve() {
            Ok(handle) => {
                self.state.replace(SiteState::Resolved(handle.clone()));
                Ok(handle)
            }
            Err(error) => {
                self.state.replace(SiteState::Failed(error.clone()));
                Err(error)
            }
        }
    }

    #[tracing::instrument(level = "debug", skip_all, fields(
        site = %self.descriptor,
        resolver = %self.resolver_descriptor,
    ))]
    fn resolve(&self) -> Result<MethodHandle, ResolutionError> {
        let resolved = self
            .resolver
            .resolve(
                &self.lookup,
                &self.descriptor,
                self.resolver_descriptor.extra_args(),
            )
            .and_then(|handle| {
                if handle.signature() == self.descriptor.signature() {
                    Ok(handle)
                } else {
                    Err(ResolutionError::SignatureMismatch {
                        operation: self.descriptor.to_string(),
                        expected: self.descriptor.signature().clone(),
                        found: handle.signature().clone(),
                    })
                }
            });
        match &resolved {
            Ok(handle) => debug!(handle = handle.name(), "call site resolved"),
            Err(error) => warn!(%error, "call site resolution failed"),
        }
        resolved
    }

    /// A handle that calls through this site.
    ///
    /// Recursive bodies call through this instead of calling themselves, so
    /// that whatever the site ends up bound to (a memoized wrapper, say) is
    /// what the recursion sees. Holds the site weakly: a body stored in the
    /// site does not keep the site alive.
    pub fn dynamic_invoker(self: &Rc<Self>) -> MethodHandle {
        let site: Weak<CallSite> = Rc::downgrade(self);
        let label = self.descriptor.to_string();
        MethodHandle::new(
            &format!("invoker({label})"),
            self.descriptor.signature().clone(),
            move |args| {
                let Some(site) = site.upgrade() else {
                    return Err(InvocationError::Unlinked {
                        site: label.clone(),
                        reason: "call site was dropped".to_string(),
                    });
                };
                site.invoke(args).map_err(|error| match error {
                    CallError::Invocation(error) => error,
                    CallError::Resolution(error) => InvocationError::Unlinked {
                        site: label.clone(),
                        reason: error.to_string(),
                    },
                })
            },
        )
    }
}

impl fmt::Debug for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match &*self.state.borrow() {
            SiteState::Unresolved => "unresolved",
            SiteState::Resolving => "resolving",
            SiteState::Resolved(_) => "resolved",
            SiteState::Failed(_) => "failed",
        };
        f.debug_struct("CallSite")
            .field("descriptor", &self.descriptor.to_string())
            .field("resolver", &self.resolver_descriptor.to_string())
            .field("state", &state)
            .finish()
    }
}
