//! Error types for handle invocation and composition.

use lazylink_ir::{Signature, Type};

/// A resolved callable failed at runtime.
///
/// Produced either by argument checks at the handle boundary or by the
/// body itself. Memoizing wrappers pass these through unchanged and never
/// cache them.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InvocationError {
    #[error("`{callee}` expects {expected} argument(s), got {got}")]
    ArityMismatch {
        callee: String,
        expected: usize,
        got: usize,
    },

    #[error("`{callee}` argument {index} expects {expected}, got {got}")]
    WrongArgumentType {
        callee: String,
        index: usize,
        expected: Type,
        got: &'static str,
    },

    #[error("cannot cast {got} to {target}")]
    ClassCast { target: Type, got: &'static str },

    #[error("call site `{site}` is not linked: {reason}")]
    Unlinked { site: String, reason: String },

    /// Arbitrary failure raised by a callable body.
    #[error("{0}")]
    Failed(String),
}

impl InvocationError {
    pub fn failed(message: impl Into<String>) -> Self {
        InvocationError::Failed(message.into())
    }
}

/// Two handles could not be composed because their signatures disagree.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CombinatorError {
    #[error("{combinator}: expected {expected} parameter(s), found {found}")]
    ArityMismatch {
        combinator: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("{combinator}: {found} is not assignable to {expected}")]
    IncompatibleTypes {
        combinator: &'static str,
        expected: Type,
        found: Type,
    },

    #[error("{combinator}: signature {found} does not match {expected}")]
    SignatureMismatch {
        combinator: &'static str,
        expected: Signature,
        found: Signature,
    },

    #[error("{combinator}: position {pos} out of range for arity {arity}")]
    PositionOutOfRange {
        combinator: &'static str,
        pos: usize,
        arity: usize,
    },

    #[error("{combinator}: void is not a value type")]
    VoidValue { combinator: &'static str },

    #[error("{combinator}: value of type {found} does not conform to {expected}")]
    ValueMismatch {
        combinator: &'static str,
        expected: Type,
        found: &'static str,
    },
}
