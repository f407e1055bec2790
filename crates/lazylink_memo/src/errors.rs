//! Errors raised while linking forward references.

use lazylink_ir::Signature;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LinkError {
    #[error("forward reference `{name}` is already linked")]
    AlreadyLinked { name: String },

    #[error("forward reference `{name}` expects {expected}, got {found}")]
    SignatureMismatch {
        name: String,
        expected: Signature,
        found: Signature,
    },
}
