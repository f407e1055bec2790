//! Dynamic values passed through method handles.

use std::fmt;
use std::rc::Rc;

use num_bigint::BigInt;

use crate::Type;

/// Runtime value flowing through call sites and cache tables.
///
/// Cheap to clone: heap payloads are reference counted. `Eq + Hash` so
/// values can key a cache table directly.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Value {
    /// Result of a void operation.
    Void,
    /// Absent reference.
    Null,
    Bool(bool),
    Int(i32),
    Long(i64),
    BigInt(Rc<BigInt>),
    Str(Rc<str>),
    /// Composite key built from several arguments. Static type `Object`.
    Tuple(Rc<[Value]>),
}

impl Value {
    /// Create a big-integer value.
    pub fn big(n: impl Into<BigInt>) -> Self {
        Value::BigInt(Rc::new(n.into()))
    }

    /// Create a string value.
    pub fn str(s: &str) -> Self {
        Value::Str(Rc::from(s))
    }

    /// Create a composite value from its parts.
    pub fn tuple(values: impl IntoIterator<Item = Value>) -> Self {
        Value::Tuple(values.into_iter().collect())
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The most specific type of this value, or `None` for `Null`.
    pub fn runtime_type(&self) -> Option<Type> {
        match self {
            Value::Void => Some(Type::Void),
            Value::Null => None,
            Value::Bool(_) => Some(Type::Bool),
            Value::Int(_) => Some(Type::Int),
            Value::Long(_) => Some(Type::Long),
            Value::BigInt(_) => Some(Type::BigInt),
            Value::Str(_) => Some(Type::Str),
            Value::Tuple(_) => Some(Type::Object),
        }
    }

    /// Human-readable type name for diagnostics.
    pub fn type_name(&self) -> &'static str {
        self.runtime_type().map_or("null", Type::name)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_long(&self) -> Option<i64> {
        match self {
            Value::Long(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_big(&self) -> Option<&BigInt> {
        match self {
            Value::BigInt(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Void => f.write_str("void"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Long(n) => write!(f, "{n}"),
            Value::BigInt(n) => write!(f, "{n}"),
            Value::Str(s) => f.write_str(s),
            Value::Tuple(parts) => {
                f.write_str("(")?;
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{part}")?;
                }
                f.write_str(")")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Long(n)
    }
}

impl From<BigInt> for Value {
    fn from(n: BigInt) -> Self {
        Value::BigInt(Rc::new(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::str(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(Rc::from(s))
    }
}
