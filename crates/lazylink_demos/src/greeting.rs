//! Greetings bound through resolvers.
//!
//! Two targets, `greet_2012` and `greet_2013`, append a year to a name.
//! The `fixed` resolver always picks `greet_2012`; the `by_tag` resolver
//! picks `greet_2013` when its static argument is `"2013"`.

use std::rc::Rc;

use lazylink_bind::{
    from_fn, CallError, CallSite, CallSiteRegistry, Lookup, MemberTable, TypedCallSite, Visibility,
};
use lazylink_handle::MethodHandle;
use lazylink_ir::{OperationDescriptor, OwnerType, ResolverDescriptor, Signature, Type, Value};

use crate::DemoError;

pub const GREETER: OwnerType = OwnerType::new("Greeter");

/// Tag selecting the newer greeting.
pub const NEXT_TAG: &str = "2013";

fn str_to_str() -> Signature {
    Signature::new([Type::Str], Type::Str)
}

fn suffixed(name: &str, suffix: &'static str) -> MethodHandle {
    MethodHandle::new(name, str_to_str(), move |args| {
        let s = args[0].as_str().unwrap_or_default();
        Ok(Value::from(format!("{s} {suffix}")))
    })
}

fn registry() -> CallSiteRegistry {
    let table = Rc::new(MemberTable::new());
    table.define_static(GREETER, "greet_2012", Visibility::Public, suffixed("greet_2012", "2012"));
    table.define_static(GREETER, "greet_2013", Visibility::Public, suffixed("greet_2013", "2013"));
    table.define_resolver(
        GREETER,
        "fixed",
        from_fn(|lookup: &Lookup, _: &OperationDescriptor, _: &[Value]| {
            lookup.find_static(GREETER, "greet_2012", &str_to_str())
        }),
    );
    table.define_resolver(
        GREETER,
        "by_tag",
        from_fn(|lookup: &Lookup, _: &OperationDescriptor, extra_args: &[Value]| {
            let target = match extra_args.first().and_then(Value::as_str) {
                Some(NEXT_TAG) => "greet_2013",
                _ => "greet_2012",
            };
            lookup.find_static(GREETER, target, &str_to_str())
        }),
    );
    CallSiteRegistry::new(Lookup::new(table, GREETER))
}

fn bind(resolver: ResolverDescriptor) -> Result<Rc<CallSite>, DemoError> {
    Ok(registry().bind(OperationDescriptor::new("greet", str_to_str()), resolver)?)
}

/// Greet through a site whose resolver ignores static arguments.
pub fn greet(name: &str) -> Result<String, DemoError> {
    let site = bind(ResolverDescriptor::new(GREETER, "fixed"))?;
    let greeting = site.invoke(&[Value::str(name)])?;
    Ok(greeting.to_string())
}

/// Greet through a site whose target depends on `tag`.
pub fn greet_tagged(name: &str, tag: Option<&str>) -> Result<String, DemoError> {
    let site = bind(tagged(tag))?;
    let greeting = site.invoke(&[Value::str(name)])?;
    Ok(greeting.to_string())
}

/// A plain Rust closure backed by a tagged greeting site.
pub fn greeter(tag: Option<&str>) -> Result<impl Fn(String) -> Result<String, CallError>, DemoError> {
    let typed: TypedCallSite<(String,), String> = TypedCallSite::new(bind(tagged(tag))?)?;
    let call = typed.into_fn();
    Ok(move |name| call((name,)))
}

fn tagged(tag: Option<&str>) -> ResolverDescriptor {
    ResolverDescriptor::new(GREETER, "by_tag").with_args(tag.map(Value::str))
}
