//! Resolution and call errors.

use lazylink_handle::{CombinatorError, InvocationError};
use lazylink_ir::{OwnerType, ResolverSignature, Signature};

/// A call site could not be bound to a target.
///
/// `Clone` so a failed site can hand the same error to every later caller.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionError {
    #[error("no resolver `{name}` declared by {owner}")]
    ResolverNotFound { owner: OwnerType, name: String },

    #[error("no method `{name}{signature}` declared by {owner}")]
    MethodNotFound {
        owner: OwnerType,
        name: String,
        signature: Signature,
    },

    #[error("`{operation}` expects {expected}, resolved target has {found}")]
    SignatureMismatch {
        operation: String,
        expected: Signature,
        found: Signature,
    },

    #[error("{caller} may not access `{name}` declared by {owner}")]
    AccessDenied {
        caller: OwnerType,
        owner: OwnerType,
        name: String,
    },

    #[error("resolver `{resolver}` declared as {expected}, called with {found}")]
    ResolverSignatureMismatch {
        resolver: String,
        expected: ResolverSignature,
        found: String,
    },

    #[error("call site `{site}` was invoked while it was being resolved")]
    RecursiveResolution { site: String },

    #[error(transparent)]
    Combinator(#[from] CombinatorError),

    /// Arbitrary failure reported by a resolver.
    #[error("resolver failed: {0}")]
    Bootstrap(String),
}

impl ResolutionError {
    pub fn bootstrap(message: impl Into<String>) -> Self {
        ResolutionError::Bootstrap(message.into())
    }
}

/// Failure of a call through a [`CallSite`](crate::CallSite).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CallError {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Invocation(#[from] InvocationError),
}
