use super::*;

#[test]
fn object_accepts_everything_but_void() {
    assert!(Type::Object.accepts(&Value::Long(3)));
    assert!(Type::Object.accepts(&Value::str("x")));
    assert!(Type::Object.accepts(&Value::tuple([Value::Int(1), Value::Int(2)])));
    assert!(Type::Object.accepts(&Value::Null));
    assert!(!Type::Object.accepts(&Value::Void));
}

#[test]
fn primitives_reject_null_and_other_primitives() {
    assert!(Type::Long.accepts(&Value::Long(1)));
    assert!(!Type::Long.accepts(&Value::Int(1)));
    assert!(!Type::Long.accepts(&Value::Null));
    assert!(!Type::Bool.accepts(&Value::Null));
}

#[test]
fn reference_types_accept_null() {
    assert!(Type::Str.accepts(&Value::Null));
    assert!(Type::BigInt.accepts(&Value::Null));
    assert!(!Type::Str.accepts(&Value::big(1)));
}

#[test]
fn assignability_is_widening_only() {
    assert!(Type::Object.is_assignable_from(Type::BigInt));
    assert!(!Type::BigInt.is_assignable_from(Type::Object));
    assert!(!Type::Object.is_assignable_from(Type::Void));
    assert!(Type::BigInt.is_castable_to(Type::Object));
    assert!(Type::Object.is_castable_to(Type::BigInt));
    assert!(!Type::Long.is_castable_to(Type::Str));
}
