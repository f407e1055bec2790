//! Owning-type tags.

use std::fmt;

/// Tag naming the type that declares an operation or a resolver.
///
/// Owners scope member lookup, access checks and cache tables: the same
/// operation name declared by two owners never shares a cache.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OwnerType {
    name: &'static str,
}

impl OwnerType {
    #[inline]
    pub const fn new(name: &'static str) -> Self {
        OwnerType { name }
    }

    #[inline]
    pub const fn name(self) -> &'static str {
        self.name
    }
}

impl fmt::Display for OwnerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
