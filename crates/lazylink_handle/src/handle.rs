//! The method handle type.

use std::fmt;
use std::rc::Rc;

use lazylink_ir::{Signature, Type, Value};

use crate::InvocationError;

/// Result of invoking a handle.
pub type InvokeResult = Result<Value, InvocationError>;

type Body = dyn Fn(&[Value]) -> InvokeResult;

/// A callable with a known signature.
///
/// Cloning is cheap (two reference-count bumps). Handles are `!Send`:
/// the whole framework assumes single-threaded use.
#[derive(Clone)]
pub struct MethodHandle {
    name: Rc<str>,
    signature: Signature,
    body: Rc<Body>,
}

impl MethodHandle {
    /// Wrap `body` as a handle of the given signature.
    ///
    /// The body receives arguments that conform to `signature` when called
    /// through [`invoke`](Self::invoke) or through a composed handle.
    pub fn new(
        name: &str,
        signature: Signature,
        body: impl Fn(&[Value]) -> InvokeResult + 'static,
    ) -> Self {
        MethodHandle {
            name: Rc::from(name),
            signature,
            body: Rc::new(body),
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

    /// Invoke with argument and result validation.
    pub fn invoke(&self, args: &[Value]) -> InvokeResult {
        self.check_args(args)?;
        let result = (self.body)(args)?;
        let ret = self.signature.ret();
        if ret == Type::Void || ret.accepts(&result) {
            Ok(result)
        } else {
            Err(InvocationError::ClassCast {
                target: ret,
                got: result.type_name(),
            })
        }
    }

    /// Invoke without validation.
    ///
    /// The caller guarantees `args` conform to the signature. Bodies still
    /// see well-typed arguments or report their own `InvocationError`.
    #[inline]
    pub fn invoke_unchecked(&self, args: &[Value]) -> InvokeResult {
        (self.body)(args)
    }

    /// Validate `args` against the parameter list.
    pub fn check_args(&self, args: &[Value]) -> Result<(), InvocationError> {
        let params = self.signature.params();
        if params.len() != args.len() {
            return Err(InvocationError::ArityMismatch {
                callee: self.name.to_string(),
                expected: params.len(),
                got: args.len(),
            });
        }
        for (index, (ty, arg)) in params.iter().zip(args).enumerate() {
            if !ty.accepts(arg) {
                return Err(InvocationError::WrongArgumentType {
                    callee: self.name.to_string(),
                    index,
                    expected: *ty,
                    got: arg.type_name(),
                });
            }
        }
        Ok(())
    }

    /// Whether both handles share the same body.
    pub fn ptr_eq(&self, other: &MethodHandle) -> bool {
        Rc::ptr_eq(&self.body, &other.body)
    }

    /// Same body under a different signature. Callers must have verified
    /// that the body tolerates the new shape.
    pub(crate) fn retyped(&self, name: String, signature: Signature) -> MethodHandle {
        MethodHandle {
            name: Rc::from(name),
            signature,
            body: Rc::clone(&self.body),
        }
    }
}

impl fmt::Debug for MethodHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodHandle")
            .field("name", &self.name)
            .field("signature", &self.signature.descriptor())
            .finish_non_exhaustive()
    }
}

/// A method declared on receiver type `R`, ready to be bound to one
/// receiver with [`bind_to`](crate::combinators::bind_to).
///
/// `params` excludes the receiver.
pub struct VirtualMethod<R> {
    pub name: &'static str,
    pub params: &'static [Type],
    pub ret: Type,
    pub body: fn(&R, &[Value]) -> InvokeResult,
}

impl<R> VirtualMethod<R> {
    pub fn signature(&self) -> Signature {
        Signature::new(self.params.iter().copied(), self.ret)
    }
}
