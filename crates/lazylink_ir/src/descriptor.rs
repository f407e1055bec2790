//! Operation and resolver descriptors.

use std::fmt;
use std::rc::Rc;

use crate::{OwnerType, Signature, Type, Value};

/// Identifies a call site: operation name plus exact signature.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct OperationDescriptor {
    name: Rc<str>,
    signature: Signature,
}

impl OperationDescriptor {
    pub fn new(name: &str, signature: Signature) -> Self {
        OperationDescriptor {
            name: Rc::from(name),
            signature,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Cache-partition key for this operation.
    pub fn selector(&self) -> Selector {
        Selector::new(&self.name, &self.signature)
    }
}

impl fmt::Display for OperationDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.signature)
    }
}

/// Operation name followed by its canonical signature, e.g. `fib(long)long`.
///
/// Two operations with the same name but different signatures get
/// different selectors and so never share a cache table.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Selector(Rc<str>);

impl Selector {
    pub fn new(name: &str, signature: &Signature) -> Self {
        let mut key = String::with_capacity(name.len() + 16);
        key.push_str(name);
        key.push_str(&signature.descriptor());
        Selector(Rc::from(key))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Static parameters a resolver accepts after the fixed
/// `(lookup, descriptor)` pair.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ResolverSignature {
    /// Any number of static arguments of any type.
    #[default]
    Variadic,
    /// Exactly these static argument types, in order.
    Fixed(Vec<Type>),
}

impl ResolverSignature {
    /// Check whether `args` may be forwarded to a resolver of this shape.
    pub fn accepts(&self, args: &[Value]) -> bool {
        match self {
            ResolverSignature::Variadic => true,
            ResolverSignature::Fixed(types) => {
                types.len() == args.len()
                    && types.iter().zip(args).all(|(ty, arg)| ty.accepts(arg))
            }
        }
    }
}

impl fmt::Display for ResolverSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolverSignature::Variadic => f.write_str("(lookup,name,signature,object...)"),
            ResolverSignature::Fixed(types) => {
                f.write_str("(lookup,name,signature")?;
                for ty in types {
                    write!(f, ",{ty}")?;
                }
                f.write_str(")")
            }
        }
    }
}

/// Names the resolver that binds a call site and the static arguments
/// forwarded to it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResolverDescriptor {
    name: Rc<str>,
    owner: OwnerType,
    signature: ResolverSignature,
    extra_args: Vec<Value>,
}

impl ResolverDescriptor {
    /// Describe resolver `name` declared by `owner`, variadic, no arguments.
    pub fn new(owner: OwnerType, name: &str) -> Self {
        ResolverDescriptor {
            name: Rc::from(name),
            owner,
            signature: ResolverSignature::Variadic,
            extra_args: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_signature(mut self, signature: ResolverSignature) -> Self {
        self.signature = signature;
        self
    }

    #[must_use]
    pub fn with_args(mut self, args: impl IntoIterator<Item = Value>) -> Self {
        self.extra_args = args.into_iter().collect();
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn owner(&self) -> OwnerType {
        self.owner
    }

    #[inline]
    pub fn signature(&self) -> &ResolverSignature {
        &self.signature
    }

    #[inline]
    pub fn extra_args(&self) -> &[Value] {
        &self.extra_args
    }
}

impl fmt::Display for ResolverDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}{}", self.owner, self.name, self.signature)
    }
}
