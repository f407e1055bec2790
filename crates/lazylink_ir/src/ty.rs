//! Static types of call-site parameters and results.

use std::fmt;

use crate::Value;

/// The type of a parameter or return slot.
///
/// `Object` is the top reference type: every non-void value conforms to it.
/// Reference types (`BigInt`, `Str`, `Object`) also accept `Value::Null`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    /// No value. Only valid as a return type.
    Void,
    Bool,
    /// 32-bit integer.
    Int,
    /// 64-bit integer.
    Long,
    /// Arbitrary-precision integer.
    BigInt,
    Str,
    /// Any value.
    Object,
}

impl Type {
    /// Name used in canonical signature descriptors.
    pub const fn name(self) -> &'static str {
        match self {
            Type::Void => "void",
            Type::Bool => "bool",
            Type::Int => "int",
            Type::Long => "long",
            Type::BigInt => "bigint",
            Type::Str => "str",
            Type::Object => "object",
        }
    }

    /// Whether values of this type may be `Null`.
    pub const fn is_reference(self) -> bool {
        matches!(self, Type::BigInt | Type::Str | Type::Object)
    }

    /// Check whether `value` may be stored in a slot of this type.
    pub fn accepts(self, value: &Value) -> bool {
        match value {
            Value::Null => self.is_reference(),
            Value::Void => self == Type::Void,
            _ => self == Type::Object || value.runtime_type() == Some(self),
        }
    }

    /// Check whether every value of `other` also conforms to `self`.
    pub fn is_assignable_from(self, other: Type) -> bool {
        self == other || (self == Type::Object && other != Type::Void)
    }

    /// Check whether a runtime cast between the two types can ever succeed.
    ///
    /// Used when adapting a handle to a new signature: narrowing from
    /// `Object` is permitted and checked on every call.
    pub fn is_castable_to(self, other: Type) -> bool {
        self.is_assignable_from(other) || other.is_assignable_from(self)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests;
