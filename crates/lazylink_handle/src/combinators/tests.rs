use std::cell::{Cell, RefCell};

use pretty_assertions::assert_eq;

use super::*;

fn add() -> MethodHandle {
    MethodHandle::new(
        "add",
        Signature::new([Type::Long, Type::Long], Type::Long),
        |args| match (&args[0], &args[1]) {
            (Value::Long(a), Value::Long(b)) => Ok(Value::Long(a + b)),
            _ => Err(InvocationError::failed("add: bad operands")),
        },
    )
}

fn is_positive() -> MethodHandle {
    MethodHandle::new(
        "is_positive",
        Signature::new([Type::Long], Type::Bool),
        |args| Ok(Value::Bool(args[0].as_long().is_some_and(|n| n > 0))),
    )
}

fn negate() -> MethodHandle {
    MethodHandle::new("negate", Signature::new([Type::Long], Type::Long), |args| {
        Ok(Value::Long(-args[0].as_long().unwrap_or_default()))
    })
}

#[test]
fn identity_returns_argument() {
    let id = identity(Type::Str).unwrap();
    assert_eq!(id.signature().descriptor(), "(str)str");
    assert_eq!(id.invoke(&[Value::str("x")]).unwrap(), Value::str("x"));
}

#[test]
fn identity_rejects_void() {
    assert_eq!(
        identity(Type::Void).unwrap_err(),
        CombinatorError::VoidValue {
            combinator: "identity"
        }
    );
}

#[test]
fn constant_checks_value_type() {
    let seven = constant(Type::Long, Value::Long(7)).unwrap();
    assert_eq!(seven.invoke(&[]).unwrap(), Value::Long(7));
    assert!(matches!(
        constant(Type::Long, Value::str("seven")),
        Err(CombinatorError::ValueMismatch { .. })
    ));
}

#[test]
fn drop_arguments_at_every_position() {
    let target = add();
    let front = drop_arguments(&target, 0, &[Type::Str]).unwrap();
    assert_eq!(front.signature().descriptor(), "(str,long,long)long");
    assert_eq!(
        front
            .invoke(&[Value::str("ignored"), Value::Long(1), Value::Long(2)])
            .unwrap(),
        Value::Long(3)
    );

    let middle = drop_arguments(&target, 1, &[Type::Bool, Type::Int]).unwrap();
    assert_eq!(middle.signature().descriptor(), "(long,bool,int,long)long");
    assert_eq!(
        middle
            .invoke(&[Value::Long(1), Value::Bool(true), Value::Int(0), Value::Long(5)])
            .unwrap(),
        Value::Long(6)
    );

    let back = drop_arguments(&target, 2, &[Type::Object]).unwrap();
    assert_eq!(
        back.invoke(&[Value::Long(4), Value::Long(4), Value::Null])
            .unwrap(),
        Value::Long(8)
    );
}

#[test]
fn drop_arguments_position_out_of_range() {
    assert_eq!(
        drop_arguments(&add(), 3, &[Type::Int]).unwrap_err(),
        CombinatorError::PositionOutOfRange {
            combinator: "drop_arguments",
            pos: 3,
            arity: 2,
        }
    );
}

#[test]
fn fold_arguments_prepends_combiner_result() {
    // target: (long sum, long a, long b) -> long, returns sum * a
    let target = MethodHandle::new(
        "scale",
        Signature::new([Type::Long, Type::Long, Type::Long], Type::Long),
        |args| {
            let sum = args[0].as_long().unwrap_or_default();
            let a = args[1].as_long().unwrap_or_default();
            Ok(Value::Long(sum * a))
        },
    );
    let folded = fold_arguments(&target, &add()).unwrap();
    assert_eq!(folded.signature().descriptor(), "(long,long)long");
    assert_eq!(
        folded.invoke(&[Value::Long(2), Value::Long(3)]).unwrap(),
        Value::Long(10)
    );
}

#[test]
fn fold_arguments_with_void_combiner_keeps_signature() {
    let seen = Rc::new(Cell::new(0_i64));
    let sink = Rc::clone(&seen);
    let observe = MethodHandle::new(
        "observe",
        Signature::new([Type::Long], Type::Void),
        move |args| {
            sink.set(args[0].as_long().unwrap_or_default());
            Ok(Value::Void)
        },
    );
    let folded = fold_arguments(&add(), &observe).unwrap();
    assert_eq!(folded.signature(), add().signature());
    assert_eq!(
        folded.invoke(&[Value::Long(9), Value::Long(1)]).unwrap(),
        Value::Long(10)
    );
    assert_eq!(seen.get(), 9);
}

#[test]
fn fold_arguments_rejects_incompatible_result() {
    let target = MethodHandle::new(
        "takes_str",
        Signature::new([Type::Str, Type::Long], Type::Long),
        |_| Ok(Value::Long(0)),
    );
    assert!(matches!(
        fold_arguments(&target, &negate()),
        Err(CombinatorError::IncompatibleTypes { .. })
    ));
}

#[test]
fn guard_with_test_dispatches_on_test() {
    let guarded = guard_with_test(
        &is_positive(),
        &identity(Type::Long).unwrap(),
        &negate(),
    )
    .unwrap();
    assert_eq!(guarded.invoke(&[Value::Long(4)]).unwrap(), Value::Long(4));
    assert_eq!(guarded.invoke(&[Value::Long(-4)]).unwrap(), Value::Long(4));
}

#[test]
fn guard_with_test_never_runs_other_branch() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let branch = |label: &'static str| {
        let log = Rc::clone(&calls);
        MethodHandle::new(label, Signature::new([Type::Long], Type::Long), move |args| {
            log.borrow_mut().push(label);
            Ok(args[0].clone())
        })
    };
    let guarded = guard_with_test(&is_positive(), &branch("yes"), &branch("no")).unwrap();
    guarded.invoke(&[Value::Long(1)]).unwrap();
    guarded.invoke(&[Value::Long(0)]).unwrap();
    assert_eq!(*calls.borrow(), vec!["yes", "no"]);
}

#[test]
fn guard_with_test_requires_matching_branches() {
    assert!(matches!(
        guard_with_test(&is_positive(), &negate(), &add()),
        Err(CombinatorError::SignatureMismatch { .. })
    ));
    assert!(matches!(
        guard_with_test(&negate(), &negate(), &negate()),
        Err(CombinatorError::IncompatibleTypes {
            expected: Type::Bool,
            ..
        })
    ));
}

struct Counter {
    hits: Cell<i64>,
}

const BUMP: VirtualMethod<Counter> = VirtualMethod {
    name: "bump",
    params: &[Type::Long],
    ret: Type::Long,
    body: |counter, args| {
        let by = args[0].as_long().unwrap_or_default();
        counter.hits.set(counter.hits.get() + by);
        Ok(Value::Long(counter.hits.get()))
    },
};

#[test]
fn bind_to_fixes_receiver() {
    let counter = Rc::new(Counter { hits: Cell::new(0) });
    let bump = bind_to(Rc::clone(&counter), &BUMP);
    assert_eq!(bump.signature().descriptor(), "(long)long");
    bump.invoke(&[Value::Long(2)]).unwrap();
    bump.invoke(&[Value::Long(3)]).unwrap();
    assert_eq!(counter.hits.get(), 5);
}

#[test]
fn as_type_widening_shares_body() {
    let id = identity(Type::Long).unwrap();
    let wide = as_type(&id, Signature::new([Type::Long], Type::Object)).unwrap();
    assert!(wide.ptr_eq(&id));
    assert_eq!(wide.signature().descriptor(), "(long)object");
}

#[test]
fn as_type_narrowing_casts_at_call_time() {
    let id = identity(Type::Object).unwrap();
    let narrow = as_type(&id, Signature::new([Type::Object], Type::Long)).unwrap();
    assert_eq!(narrow.invoke(&[Value::Long(1)]).unwrap(), Value::Long(1));
    assert_eq!(
        narrow.invoke(&[Value::str("one")]).unwrap_err(),
        InvocationError::ClassCast {
            target: Type::Long,
            got: "str",
        }
    );
}

#[test]
fn as_type_void_return_discards() {
    let narrowed = as_type(&negate(), Signature::new([Type::Long], Type::Void)).unwrap();
    assert_eq!(narrowed.invoke(&[Value::Long(3)]).unwrap(), Value::Void);
}

#[test]
fn as_type_rejects_unrelated_types() {
    assert!(matches!(
        as_type(&negate(), Signature::new([Type::Str], Type::Long)),
        Err(CombinatorError::IncompatibleTypes { .. })
    ));
    assert!(matches!(
        as_type(&negate(), Signature::new([Type::Long, Type::Long], Type::Long)),
        Err(CombinatorError::ArityMismatch { .. })
    ));
}

#[test]
fn collect_arguments_replaces_slot() {
    // (long, long) -> long, where the second slot is computed from two ints.
    let pair_sum = MethodHandle::new(
        "pair_sum",
        Signature::new([Type::Int, Type::Int], Type::Long),
        |args| {
            let a = args[0].as_int().unwrap_or_default();
            let b = args[1].as_int().unwrap_or_default();
            Ok(Value::Long(i64::from(a) + i64::from(b)))
        },
    );
    let collected = collect_arguments(&add(), 1, &pair_sum).unwrap();
    assert_eq!(collected.signature().descriptor(), "(long,int,int)long");
    assert_eq!(
        collected
            .invoke(&[Value::Long(10), Value::Int(2), Value::Int(3)])
            .unwrap(),
        Value::Long(15)
    );
}

#[test]
fn collect_arguments_void_filter_inserts_params() {
    let noop = MethodHandle::new("noop", Signature::new([Type::Str], Type::Void), |_| {
        Ok(Value::Void)
    });
    let collected = collect_arguments(&add(), 0, &noop).unwrap();
    assert_eq!(collected.signature().descriptor(), "(str,long,long)long");
    assert_eq!(
        collected
            .invoke(&[Value::str("x"), Value::Long(1), Value::Long(1)])
            .unwrap(),
        Value::Long(2)
    );
}

#[test]
fn filter_return_chains_result() {
    let filtered = filter_return(&add(), &negate()).unwrap();
    assert_eq!(filtered.signature().descriptor(), "(long,long)long");
    assert_eq!(
        filtered.invoke(&[Value::Long(1), Value::Long(2)]).unwrap(),
        Value::Long(-3)
    );
    assert!(matches!(
        filter_return(&add(), &add()),
        Err(CombinatorError::ArityMismatch { .. })
    ));
}

#[test]
fn errors_propagate_through_compositions() {
    let failing = MethodHandle::new("boom", Signature::new([Type::Long], Type::Long), |_| {
        Err(InvocationError::failed("boom"))
    });
    let composed = filter_return(&failing, &negate()).unwrap();
    assert_eq!(
        composed.invoke(&[Value::Long(1)]).unwrap_err(),
        InvocationError::failed("boom")
    );
}

#[test]
fn invoke_checks_arguments() {
    let handle = add();
    assert!(matches!(
        handle.invoke(&[Value::Long(1)]),
        Err(InvocationError::ArityMismatch {
            expected: 2,
            got: 1,
            ..
        })
    ));
    assert!(matches!(
        handle.invoke(&[Value::Long(1), Value::Int(1)]),
        Err(InvocationError::WrongArgumentType { index: 1, .. })
    ));
}
