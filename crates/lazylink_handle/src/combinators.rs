//! Primitive handle combinators.
//!
//! Each combinator checks signatures when it builds a handle and then
//! calls its parts unchecked. The set mirrors what a memoizing wrapper
//! needs: `identity`, `constant`, `drop_arguments`, `fold_arguments`,
//! `guard_with_test`, `bind_to`, plus the adapters `as_type`,
//! `collect_arguments` and `filter_return`.

use std::rc::Rc;

use lazylink_ir::{Signature, Type, Value};
use smallvec::SmallVec;

use crate::{CombinatorError, InvocationError, MethodHandle, VirtualMethod};

/// Argument buffer used when a combinator has to rebuild the argument list.
type ArgBuf = SmallVec<[Value; 4]>;

/// `(ty) -> ty`, returning its argument unchanged.
pub fn identity(ty: Type) -> Result<MethodHandle, CombinatorError> {
    if ty == Type::Void {
        return Err(CombinatorError::VoidValue {
            combinator: "identity",
        });
    }
    Ok(MethodHandle::new(
        &format!("identity({ty})"),
        Signature::new([ty], ty),
        |args| Ok(args[0].clone()),
    ))
}

/// `() -> ty`, always returning `value`.
pub fn constant(ty: Type, value: Value) -> Result<MethodHandle, CombinatorError> {
    if ty == Type::Void {
        return Err(CombinatorError::VoidValue {
            combinator: "constant",
        });
    }
    if !ty.accepts(&value) {
        return Err(CombinatorError::ValueMismatch {
            combinator: "constant",
            expected: ty,
            found: value.type_name(),
        });
    }
    Ok(MethodHandle::new(
        &format!("constant({ty})"),
        Signature::nullary(ty),
        move |_| Ok(value.clone()),
    ))
}

/// Accept extra `types` at `pos` and ignore them.
pub fn drop_arguments(
    target: &MethodHandle,
    pos: usize,
    types: &[Type],
) -> Result<MethodHandle, CombinatorError> {
    let arity = target.signature().arity();
    if pos > arity {
        return Err(CombinatorError::PositionOutOfRange {
            combinator: "drop_arguments",
            pos,
            arity,
        });
    }
    if types.contains(&Type::Void) {
        return Err(CombinatorError::VoidValue {
            combinator: "drop_arguments",
        });
    }
    let count = types.len();
    let signature = target.signature().insert_params(pos, types);
    let inner = target.clone();
    Ok(MethodHandle::new(
        &format!("drop({})", target.name()),
        signature,
        move |args| {
            if pos == 0 {
                inner.invoke_unchecked(&args[count..])
            } else if pos == arity {
                inner.invoke_unchecked(&args[..pos])
            } else {
                let kept: ArgBuf = args[..pos]
                    .iter()
                    .chain(&args[pos + count..])
                    .cloned()
                    .collect();
                inner.invoke_unchecked(&kept)
            }
        },
    ))
}

/// Call `combiner` on the leading arguments, then call `target` with the
/// combiner's result prepended.
///
/// When the combiner returns `void`, nothing is prepended and the result
/// has `target`'s signature. Otherwise the result drops `target`'s first
/// parameter: `target: (C, A...) -> R`, `combiner: (A'...) -> C` gives
/// `(A...) -> R`.
pub fn fold_arguments(
    target: &MethodHandle,
    combiner: &MethodHandle,
) -> Result<MethodHandle, CombinatorError> {
    const NAME: &str = "fold_arguments";
    let target_sig = target.signature();
    let combiner_sig = combiner.signature();
    let folds_value = combiner_sig.ret() != Type::Void;
    let skip = usize::from(folds_value);
    let combined = combiner_sig.arity();

    if target_sig.arity() < skip + combined {
        return Err(CombinatorError::ArityMismatch {
            combinator: NAME,
            expected: skip + combined,
            found: target_sig.arity(),
        });
    }
    if folds_value {
        expect_assignable(NAME, target_sig.params()[0], combiner_sig.ret())?;
    }
    for (expected, found) in combiner_sig
        .params()
        .iter()
        .zip(&target_sig.params()[skip..])
    {
        expect_assignable(NAME, *expected, *found)?;
    }

    let signature = if folds_value {
        target_sig.drop_params(0, 1)
    } else {
        target_sig.clone()
    };
    let outer = target.clone();
    let inner = combiner.clone();
    Ok(MethodHandle::new(
        &format!("fold({}, {})", target.name(), combiner.name()),
        signature,
        move |args| {
            let folded = inner.invoke_unchecked(&args[..combined])?;
            if folds_value {
                let mut full = ArgBuf::with_capacity(args.len() + 1);
                full.push(folded);
                full.extend(args.iter().cloned());
                outer.invoke_unchecked(&full)
            } else {
                outer.invoke_unchecked(args)
            }
        },
    ))
}

/// Call `test` on the leading arguments; dispatch to `target` when it
/// returns `true`, to `fallback` otherwise.
pub fn guard_with_test(
    test: &MethodHandle,
    target: &MethodHandle,
    fallback: &MethodHandle,
) -> Result<MethodHandle, CombinatorError> {
    const NAME: &str = "guard_with_test";
    if test.signature().ret() != Type::Bool {
        return Err(CombinatorError::IncompatibleTypes {
            combinator: NAME,
            expected: Type::Bool,
            found: test.signature().ret(),
        });
    }
    if target.signature() != fallback.signature() {
        return Err(CombinatorError::SignatureMismatch {
            combinator: NAME,
            expected: target.signature().clone(),
            found: fallback.signature().clone(),
        });
    }
    let tested = test.signature().arity();
    if tested > target.signature().arity() {
        return Err(CombinatorError::ArityMismatch {
            combinator: NAME,
            expected: target.signature().arity(),
            found: tested,
        });
    }
    for (expected, found) in test
        .signature()
        .params()
        .iter()
        .zip(target.signature().params())
    {
        expect_assignable(NAME, *expected, *found)?;
    }

    let test = test.clone();
    let on_true = target.clone();
    let on_false = fallback.clone();
    Ok(MethodHandle::new(
        &format!("guard({})", test.name()),
        target.signature().clone(),
        move |args| match test.invoke_unchecked(&args[..tested])? {
            Value::Bool(true) => on_true.invoke_unchecked(args),
            Value::Bool(false) => on_false.invoke_unchecked(args),
            other => Err(InvocationError::ClassCast {
                target: Type::Bool,
                got: other.type_name(),
            }),
        },
    ))
}

/// Fix the receiver of a virtual method, yielding a plain handle.
pub fn bind_to<R: 'static>(receiver: Rc<R>, method: &VirtualMethod<R>) -> MethodHandle {
    let body = method.body;
    MethodHandle::new(
        &format!("{}.bound", method.name),
        method.signature(),
        move |args| body(&receiver, args),
    )
}

/// View `target` under `signature`, inserting runtime casts where the new
/// types are wider than the old ones.
///
/// A `void` return type discards the result.
pub fn as_type(
    target: &MethodHandle,
    signature: Signature,
) -> Result<MethodHandle, CombinatorError> {
    const NAME: &str = "as_type";
    let old = target.signature();
    if old.arity() != signature.arity() {
        return Err(CombinatorError::ArityMismatch {
            combinator: NAME,
            expected: old.arity(),
            found: signature.arity(),
        });
    }

    let mut casts: SmallVec<[(usize, Type); 4]> = SmallVec::new();
    for (index, (&from, &to)) in signature.params().iter().zip(old.params()).enumerate() {
        if !from.is_castable_to(to) {
            return Err(CombinatorError::IncompatibleTypes {
                combinator: NAME,
                expected: to,
                found: from,
            });
        }
        if !to.is_assignable_from(from) {
            casts.push((index, to));
        }
    }

    let new_ret = signature.ret();
    let discard = new_ret == Type::Void && old.ret() != Type::Void;
    if !discard && !old.ret().is_castable_to(new_ret) {
        return Err(CombinatorError::IncompatibleTypes {
            combinator: NAME,
            expected: new_ret,
            found: old.ret(),
        });
    }
    let cast_ret = !discard && !new_ret.is_assignable_from(old.ret());

    let name = format!("as_type({})", target.name());
    if casts.is_empty() && !cast_ret && !discard {
        return Ok(target.retyped(name, signature));
    }

    let inner = target.clone();
    Ok(MethodHandle::new(&name, signature, move |args| {
        for &(index, ty) in &casts {
            check_cast(ty, &args[index])?;
        }
        let result = inner.invoke_unchecked(args)?;
        if discard {
            return Ok(Value::Void);
        }
        if cast_ret {
            check_cast(new_ret, &result)?;
        }
        Ok(result)
    }))
}

/// Replace `target`'s parameter at `pos` with the parameters of `filter`,
/// feeding the filter's result into that slot.
///
/// A `void` filter consumes nothing and its parameters are inserted at
/// `pos` in addition to `target`'s.
pub fn collect_arguments(
    target: &MethodHandle,
    pos: usize,
    filter: &MethodHandle,
) -> Result<MethodHandle, CombinatorError> {
    const NAME: &str = "collect_arguments";
    let target_sig = target.signature();
    let filter_sig = filter.signature();
    let replaces = filter_sig.ret() != Type::Void;
    let arity = target_sig.arity();
    if pos > arity || (replaces && pos == arity) {
        return Err(CombinatorError::PositionOutOfRange {
            combinator: NAME,
            pos,
            arity,
        });
    }
    if replaces {
        expect_assignable(NAME, target_sig.params()[pos], filter_sig.ret())?;
    }

    let base = if replaces {
        target_sig.drop_params(pos, pos + 1)
    } else {
        target_sig.clone()
    };
    let signature = base.insert_params(pos, filter_sig.params());
    let collected = filter_sig.arity();
    let outer = target.clone();
    let inner = filter.clone();
    Ok(MethodHandle::new(
        &format!("collect({}, {})", target.name(), filter.name()),
        signature,
        move |args| {
            let value = inner.invoke_unchecked(&args[pos..pos + collected])?;
            if replaces {
                let rebuilt: ArgBuf = args[..pos]
                    .iter()
                    .cloned()
                    .chain(std::iter::once(value))
                    .chain(args[pos + collected..].iter().cloned())
                    .collect();
                outer.invoke_unchecked(&rebuilt)
            } else {
                let rest: ArgBuf = args[..pos]
                    .iter()
                    .chain(&args[pos + collected..])
                    .cloned()
                    .collect();
                outer.invoke_unchecked(&rest)
            }
        },
    ))
}

/// Pass `target`'s result through the unary `filter`.
pub fn filter_return(
    target: &MethodHandle,
    filter: &MethodHandle,
) -> Result<MethodHandle, CombinatorError> {
    const NAME: &str = "filter_return";
    let filter_sig = filter.signature();
    if filter_sig.arity() != 1 {
        return Err(CombinatorError::ArityMismatch {
            combinator: NAME,
            expected: 1,
            found: filter_sig.arity(),
        });
    }
    expect_assignable(NAME, filter_sig.params()[0], target.signature().ret())?;

    let signature = target.signature().change_return(filter_sig.ret());
    let first = target.clone();
    let then = filter.clone();
    Ok(MethodHandle::new(
        &format!("filter({}, {})", target.name(), filter.name()),
        signature,
        move |args| {
            let value = first.invoke_unchecked(args)?;
            then.invoke_unchecked(std::slice::from_ref(&value))
        },
    ))
}

fn expect_assignable(
    combinator: &'static str,
    expected: Type,
    found: Type,
) -> Result<(), CombinatorError> {
    if expected.is_assignable_from(found) {
        Ok(())
    } else {
        Err(CombinatorError::IncompatibleTypes {
            combinator,
            expected,
            found,
        })
    }
}

fn check_cast(target: Type, value: &Value) -> Result<(), InvocationError> {
    if target.accepts(value) {
        Ok(())
    } else {
        Err(InvocationError::ClassCast {
            target,
            got: value.type_name(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests;
