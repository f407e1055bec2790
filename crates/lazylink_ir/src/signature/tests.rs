use super::*;
use pretty_assertions::assert_eq;

#[test]
fn descriptor_lists_params_then_return() {
    let sig = Signature::new([Type::Long, Type::Long, Type::Int], Type::Long);
    assert_eq!(sig.descriptor(), "(long,long,int)long");
    assert_eq!(Signature::nullary(Type::Str).descriptor(), "()str");
}

#[test]
fn insert_and_drop_params() {
    let sig = Signature::new([Type::BigInt], Type::BigInt);
    let widened = sig.insert_params(0, &[Type::Object]);
    assert_eq!(widened.params(), &[Type::Object, Type::BigInt]);
    assert_eq!(widened.drop_params(0, 1), sig);

    // Out-of-range positions are clamped.
    let appended = sig.insert_params(9, &[Type::Bool]);
    assert_eq!(appended.params(), &[Type::BigInt, Type::Bool]);
}

#[test]
fn change_param_and_return() {
    let sig = Signature::new([Type::Long], Type::Long);
    assert_eq!(
        sig.change_param(0, Type::Object).change_return(Type::Object),
        Signature::new([Type::Object], Type::Object)
    );
    assert_eq!(sig.change_param(4, Type::Object), sig);
}
