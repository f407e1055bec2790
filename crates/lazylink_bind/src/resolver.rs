//! The resolver protocol.

use lazylink_handle::MethodHandle;
use lazylink_ir::{OperationDescriptor, ResolverSignature, Type, Value};

use crate::{Lookup, ResolutionError};

/// Decides which callable a call site binds to.
///
/// Runs at most once per call site, on its first invocation. `lookup`
/// carries the identity and access rights of the code that declared the
/// site. `extra_args` are the static arguments from the resolver
/// descriptor; one resolver can serve a family of operations by
/// dispatching on them.
///
/// Closures of the right shape are resolvers with a variadic signature.
pub trait Resolver {
    /// Static parameters this resolver accepts after `(lookup, descriptor)`.
    fn signature(&self) -> ResolverSignature {
        ResolverSignature::Variadic
    }

    fn resolve(
        &self,
        lookup: &Lookup,
        descriptor: &OperationDescriptor,
        extra_args: &[Value],
    ) -> Result<MethodHandle, ResolutionError>;
}

impl<F> Resolver for F
where
    F: Fn(&Lookup, &OperationDescriptor, &[Value]) -> Result<MethodHandle, ResolutionError>,
{
    fn resolve(
        &self,
        lookup: &Lookup,
        descriptor: &OperationDescriptor,
        extra_args: &[Value],
    ) -> Result<MethodHandle, ResolutionError> {
        self(lookup, descriptor, extra_args)
    }
}

/// Declare `body` as a variadic resolver.
///
/// Only guides closure type inference; any closure of this shape already
/// implements [`Resolver`].
pub fn from_fn<F>(body: F) -> F
where
    F: Fn(&Lookup, &OperationDescriptor, &[Value]) -> Result<MethodHandle, ResolutionError>,
{
    body
}

/// A resolver with a fixed list of static parameter types.
pub struct FixedResolver<F> {
    params: Vec<Type>,
    body: F,
}

/// Declare `body` as a resolver taking exactly `params` as static arguments.
pub fn fixed<F>(params: impl IntoIterator<Item = Type>, body: F) -> FixedResolver<F>
where
    F: Fn(&Lookup, &OperationDescriptor, &[Value]) -> Result<MethodHandle, ResolutionError>,
{
    FixedResolver {
        params: params.into_iter().collect(),
        body,
    }
}

impl<F> Resolver for FixedResolver<F>
where
    F: Fn(&Lookup, &OperationDescriptor, &[Value]) -> Result<MethodHandle, ResolutionError>,
{
    fn signature(&self) -> ResolverSignature {
        ResolverSignature::Fixed(self.params.clone())
    }

    fn resolve(
        &self,
        lookup: &Lookup,
        descriptor: &OperationDescriptor,
        extra_args: &[Value],
    ) -> Result<MethodHandle, ResolutionError> {
        (self.body)(lookup, descriptor, extra_args)
    }
}
