//! Statically typed access to a call site.
//!
//! [`TypedCallSite`] checks once that a site's signature matches a Rust
//! argument tuple and result type, then marshals values on each call.

use std::marker::PhantomData;
use std::rc::Rc;

use lazylink_handle::InvocationError;
use lazylink_ir::{BigInt, Signature, Type, Value};
use smallvec::SmallVec;

use crate::{CallError, CallSite, ResolutionError};

/// A Rust type that can be passed as a call-site argument.
pub trait IntoValue {
    /// Declared parameter type.
    const TYPE: Type;

    fn into_value(self) -> Value;
}

/// A Rust type that can be produced from a call-site result.
pub trait FromValue: Sized {
    /// Declared return type.
    const TYPE: Type;

    /// `None` if `value` does not have this type.
    fn from_value(value: Value) -> Option<Self>;
}

impl FromValue for () {
    const TYPE: Type = Type::Void;

    fn from_value(value: Value) -> Option<Self> {
        matches!(value, Value::Void).then_some(())
    }
}

impl IntoValue for Value {
    const TYPE: Type = Type::Object;

    fn into_value(self) -> Value {
        self
    }
}

impl FromValue for Value {
    const TYPE: Type = Type::Object;

    fn from_value(value: Value) -> Option<Self> {
        Some(value)
    }
}

macro_rules! impl_value_conversions {
    ($($rust:ty => $ty:ident via $as:ident;)*) => {
        $(
            impl IntoValue for $rust {
                const TYPE: Type = Type::$ty;

                fn into_value(self) -> Value {
                    Value::from(self)
                }
            }

            impl FromValue for $rust {
                const TYPE: Type = Type::$ty;

                fn from_value(value: Value) -> Option<Self> {
                    value.$as()
                }
            }
        )*
    };
}

impl_value_conversions! {
    bool => Bool via as_bool;
    i32 => Int via as_int;
    i64 => Long via as_long;
}

impl IntoValue for BigInt {
    const TYPE: Type = Type::BigInt;

    fn into_value(self) -> Value {
        Value::from(self)
    }
}

impl FromValue for BigInt {
    const TYPE: Type = Type::BigInt;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::BigInt(n) => Some(Rc::try_unwrap(n).unwrap_or_else(|shared| (*shared).clone())),
            _ => None,
        }
    }
}

impl IntoValue for String {
    const TYPE: Type = Type::Str;

    fn into_value(self) -> Value {
        Value::from(self)
    }
}

impl FromValue for String {
    const TYPE: Type = Type::Str;

    fn from_value(value: Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

/// A tuple of [`IntoValue`] arguments.
pub trait ArgList {
    fn types() -> SmallVec<[Type; 4]>;

    fn into_values(self) -> SmallVec<[Value; 4]>;
}

macro_rules! impl_arg_list {
    ($($name:ident),*) => {
        impl<$($name: IntoValue),*> ArgList for ($($name,)*) {
            fn types() -> SmallVec<[Type; 4]> {
                SmallVec::from_slice(&[$($name::TYPE),*])
            }

            #[allow(non_snake_case)]
            fn into_values(self) -> SmallVec<[Value; 4]> {
                let ($($name,)*) = self;
                [$($name.into_value()),*].into_iter().collect()
            }
        }
    };
}

impl_arg_list!();
impl_arg_list!(A);
impl_arg_list!(A, B);
impl_arg_list!(A, B, C);
impl_arg_list!(A, B, C, D);

/// A call site viewed as `fn(A) -> R`.
pub struct TypedCallSite<A, R> {
    site: Rc<CallSite>,
    marker: PhantomData<fn(A) -> R>,
}

impl<A: ArgList, R: FromValue> TypedCallSite<A, R> {
    /// Check that `site` has exactly the signature of `A -> R`.
    pub fn new(site: Rc<CallSite>) -> Result<Self, ResolutionError> {
        let expected = Signature::new(A::types(), R::TYPE);
        let found = site.descriptor().signature();
        if *found != expected {
            return Err(ResolutionError::SignatureMismatch {
                operation: site.descriptor().to_string(),
                expected,
                found: found.clone(),
            });
        }
        Ok(TypedCallSite {
            site,
            marker: PhantomData,
        })
    }

    pub fn call(&self, args: A) -> Result<R, CallError> {
        let result = self.site.invoke(&args.into_values())?;
        let got = result.type_name();
        R::from_value(result).ok_or_else(|| {
            CallError::Invocation(InvocationError::ClassCast {
                target: R::TYPE,
                got,
            })
        })
    }

    /// Turn this into a plain closure.
    pub fn into_fn(self) -> impl Fn(A) -> Result<R, CallError> {
        move |args| self.call(args)
    }

    #[inline]
    pub fn site(&self) -> &Rc<CallSite> {
        &self.site
    }
}

impl<A, R> Clone for TypedCallSite<A, R> {
    fn clone(&self) -> Self {
        TypedCallSite {
            site: Rc::clone(&self.site),
            marker: PhantomData,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests;
