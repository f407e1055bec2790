use pretty_assertions::assert_eq;

use super::*;
use crate::{from_fn, CallSiteRegistry, Lookup, MemberTable};
use lazylink_handle::MethodHandle;
use lazylink_ir::{OperationDescriptor, OwnerType, ResolverDescriptor};

const BENCH: OwnerType = OwnerType::new("Bench");

fn sum_and_multiply() -> MethodHandle {
    MethodHandle::new(
        "sum_and_multiply",
        Signature::new([Type::Long, Type::Long, Type::Int], Type::Long),
        |args| {
            let a = args[0].as_long().unwrap_or_default();
            let b = args[1].as_long().unwrap_or_default();
            let m = args[2].as_int().unwrap_or_default();
            Ok(Value::Long(i64::from(m) * (a + b)))
        },
    )
}

fn site_for(name: &str, signature: Signature) -> Rc<CallSite> {
    let table = Rc::new(MemberTable::new());
    table.define_resolver(
        BENCH,
        "link",
        from_fn(|_: &Lookup, _: &OperationDescriptor, _: &[Value]| Ok(sum_and_multiply())),
    );
    let registry = CallSiteRegistry::new(Lookup::new(table, BENCH));
    registry
        .bind(
            OperationDescriptor::new(name, signature),
            ResolverDescriptor::new(BENCH, "link"),
        )
        .unwrap()
}

#[test]
fn typed_call_marshals_arguments_and_result() {
    let site = site_for(
        "sum_and_multiply",
        Signature::new([Type::Long, Type::Long, Type::Int], Type::Long),
    );
    let typed: TypedCallSite<(i64, i64, i32), i64> = TypedCallSite::new(site).unwrap();
    assert_eq!(typed.call((3, 4, 2)).unwrap(), 14);

    let f = typed.into_fn();
    assert_eq!(f((1, 1, 5)).unwrap(), 10);
}

#[test]
fn typed_site_rejects_wrong_rust_types() {
    let site = site_for(
        "sum_and_multiply",
        Signature::new([Type::Long, Type::Long, Type::Int], Type::Long),
    );
    let result = TypedCallSite::<(i64, i64, i64), i64>::new(site);
    assert!(matches!(
        result,
        Err(ResolutionError::SignatureMismatch { .. })
    ));
}

#[test]
fn typed_call_surfaces_resolution_errors() {
    // Descriptor disagrees with what the resolver returns.
    let site = site_for("sum", Signature::new([Type::Long, Type::Long], Type::Long));
    let typed: TypedCallSite<(i64, i64), i64> = TypedCallSite::new(site).unwrap();
    assert!(matches!(
        typed.call((1, 2)),
        Err(CallError::Resolution(ResolutionError::SignatureMismatch { .. }))
    ));
}

#[test]
fn arg_lists_describe_their_types() {
    assert_eq!(<()>::types().as_slice(), &[] as &[Type]);
    assert_eq!(
        <(bool, String, BigInt, Value)>::types().as_slice(),
        &[Type::Bool, Type::Str, Type::BigInt, Type::Object]
    );
    assert_eq!(
        (7_i32, String::from("x")).into_values().as_slice(),
        &[Value::Int(7), Value::str("x")]
    );
}

#[test]
fn from_value_checks_types() {
    assert_eq!(String::from_value(Value::str("a")), Some("a".to_string()));
    assert_eq!(String::from_value(Value::Null), None);
    assert_eq!(<i64 as FromValue>::from_value(Value::Int(1)), None);
    assert_eq!(
        BigInt::from_value(Value::big(12)),
        Some(BigInt::from(12))
    );
    assert_eq!(<()>::from_value(Value::Void), Some(()));
}
