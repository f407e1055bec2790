use pretty_assertions::assert_eq;

use super::*;
use crate::{fixed, from_fn, MemberTable};
use lazylink_handle::MethodHandle;
use lazylink_ir::{OwnerType, Signature, Type};

const GREETER: OwnerType = OwnerType::new("Greeter");

fn hello() -> MethodHandle {
    MethodHandle::new("hello", Signature::nullary(Type::Str), |_| {
        Ok(Value::str("hello"))
    })
}

fn registry() -> CallSiteRegistry {
    let table = Rc::new(MemberTable::new());
    table.define_resolver(
        GREETER,
        "any",
        from_fn(|_: &Lookup, _: &OperationDescriptor, _: &[Value]| Ok(hello())),
    );
    table.define_resolver(
        GREETER,
        "tagged",
        fixed([Type::Str], |_: &Lookup, _: &OperationDescriptor, _: &[Value]| {
            Ok(hello())
        }),
    );
    CallSiteRegistry::new(Lookup::new(table, GREETER))
}

fn greet() -> OperationDescriptor {
    OperationDescriptor::new("greet", Signature::nullary(Type::Str))
}

#[test]
fn bind_locates_resolver_eagerly() {
    let registry = registry();
    assert_eq!(
        registry
            .bind(greet(), ResolverDescriptor::new(GREETER, "absent"))
            .unwrap_err(),
        ResolutionError::ResolverNotFound {
            owner: GREETER,
            name: "absent".to_string(),
        }
    );
    assert!(registry.is_empty());
}

#[test]
fn variadic_resolver_takes_any_arguments() {
    let registry = registry();
    let site = registry
        .bind(
            greet(),
            ResolverDescriptor::new(GREETER, "any").with_args([Value::Long(1), Value::str("x")]),
        )
        .unwrap();
    assert_eq!(site.invoke(&[]).unwrap(), Value::str("hello"));
}

#[test]
fn fixed_resolver_checks_declared_shape() {
    let registry = registry();
    let tagged = ResolverDescriptor::new(GREETER, "tagged")
        .with_signature(ResolverSignature::Fixed(vec![Type::Str]));

    assert!(registry
        .bind(greet(), tagged.clone().with_args([Value::str("2013")]))
        .is_ok());

    assert!(matches!(
        registry.bind(greet(), tagged.clone().with_args([Value::Long(2013)])),
        Err(ResolutionError::ResolverSignatureMismatch { .. })
    ));
    assert!(matches!(
        registry.bind(greet(), tagged.with_args([])),
        Err(ResolutionError::ResolverSignatureMismatch { .. })
    ));
    assert!(matches!(
        registry.bind(
            greet(),
            ResolverDescriptor::new(GREETER, "tagged").with_args([Value::str("2013")])
        ),
        Err(ResolutionError::ResolverSignatureMismatch { .. })
    ));
}

#[test]
fn each_bind_creates_an_independent_site() {
    let registry = registry();
    let first = registry
        .bind(greet(), ResolverDescriptor::new(GREETER, "any"))
        .unwrap();
    let second = registry
        .bind(greet(), ResolverDescriptor::new(GREETER, "any"))
        .unwrap();
    assert!(!Rc::ptr_eq(&first, &second));
    assert_eq!(registry.len(), 2);

    first.invoke(&[]).unwrap();
    assert_eq!(registry.resolved_count(), 1);
    assert!(!second.is_resolved());
    assert_eq!(registry.sites().len(), 2);
}
