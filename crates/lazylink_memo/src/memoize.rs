//! The memoizing combinator.
//!
//! For a raw handle `(P...) -> R` and a table `T`, the wrapper is
//!
//! ```text
//! fold(guard(not_null, drop(identity), drop(fold(update, raw))), get ∘ key)
//! ```
//!
//! - `get ∘ key`: look the argument key up in `T` (`Null` when missing)
//! - `not_null`: was anything cached?
//! - `drop(identity)`: yes, return it and ignore the arguments
//! - `fold(update, raw)`: no, call `raw`, store the result, return it
//!
//! An error from `raw` short-circuits the fold before `update`, so failures
//! are never cached.

use std::rc::Rc;

use lazylink_handle::combinators::{
    as_type, bind_to, collect_arguments, constant, drop_arguments, filter_return, fold_arguments,
    guard_with_test, identity,
};
use lazylink_handle::{CombinatorError, MethodHandle};
use lazylink_ir::{OwnerType, Selector, Signature, Type, Value};
use tracing::debug;

use crate::{CacheTable, CacheTableStore};

/// Wrap `raw` so results are served from `table` when present.
///
/// Unary operations key the table on their argument, others on a tuple of
/// all arguments (the empty tuple for nullary operations).
pub fn memoize(raw: &MethodHandle, table: &Rc<CacheTable>) -> Result<MethodHandle, CombinatorError> {
    let signature = raw.signature();
    let ret = signature.ret();
    if ret == Type::Void {
        return Err(CombinatorError::VoidValue {
            combinator: "memoize",
        });
    }
    let params = signature.params();
    let key = key_of(signature)?;

    // (object cached, P...) -> R, returning the cached value.
    let hit = drop_arguments(
        &as_type(&identity(ret)?, Signature::new([Type::Object], ret))?,
        1,
        params,
    )?;

    // (R result, P...) -> R, storing under the argument key.
    let update = as_type(
        &collect_arguments(&bind_to(Rc::clone(table), &CacheTable::UPDATE), 1, &key)?,
        signature.insert_params(0, &[ret]),
    )?;

    // (object cached, P...) -> R, computing and storing.
    let miss = drop_arguments(&fold_arguments(&update, raw)?, 0, &[Type::Object])?;

    let combiner = guard_with_test(&not_null(), &hit, &miss)?;
    let query = filter_return(&key, &bind_to(Rc::clone(table), &CacheTable::GET))?;
    let memoized = fold_arguments(&combiner, &query)?;

    debug!(raw = raw.name(), selector = %table.selector(), "memoized");
    Ok(memoized)
}

/// Memoize `raw` into the table for `(owner, selector)` in `store`.
pub fn memoize_in(
    store: &CacheTableStore,
    raw: &MethodHandle,
    owner: OwnerType,
    selector: &Selector,
) -> Result<MethodHandle, CombinatorError> {
    memoize(raw, &store.table_for(owner, selector))
}

/// `(P...) -> object`, producing the cache key for an argument list.
fn key_of(signature: &Signature) -> Result<MethodHandle, CombinatorError> {
    let params = signature.params();
    match params {
        [] => constant(Type::Object, Value::tuple([])),
        [only] => as_type(
            &identity(Type::Object)?,
            Signature::new([*only], Type::Object),
        ),
        _ => Ok(MethodHandle::new(
            "tuple_key",
            signature.change_return(Type::Object),
            |args| Ok(Value::tuple(args.iter().cloned())),
        )),
    }
}

fn not_null() -> MethodHandle {
    MethodHandle::new(
        "not_null",
        Signature::new([Type::Object], Type::Bool),
        |args| Ok(Value::Bool(!args[0].is_null())),
    )
}
