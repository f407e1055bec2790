//! Fibonacci sums: naive recursion, recursion through a call site, and
//! memoized recursion.
//!
//! The raw bodies never call themselves directly. They recurse through a
//! [`Forward`] that is linked to the call site's dynamic invoker once the
//! site exists, so the recursion sees whatever the site resolved to: the
//! raw body itself under [`Linkage::Constant`], or its memoized wrapper
//! under [`Linkage::Memoized`].

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use lazylink_bind::{
    from_fn, CallError, CallSite, CallSiteRegistry, Lookup, MemberTable, TypedCallSite, Visibility,
};
use lazylink_handle::{InvocationError, InvokeResult, MethodHandle};
use lazylink_ir::{BigInt, OperationDescriptor, OwnerType, ResolverDescriptor, Signature, Type, Value};
use lazylink_memo::{CacheTableStore, Forward, MemoizingResolver};
use num_traits::{One, Zero};
use tracing::debug;

use crate::DemoError;

/// Owner of the Fibonacci operations and resolvers.
pub const FIBONACCI: OwnerType = OwnerType::new("Fibonacci");

/// How a Fibonacci call site is bound.
#[derive(Clone, Debug)]
pub enum Linkage {
    /// Bind straight to the raw body.
    Constant,
    /// Bind to the raw body memoized in `store`.
    Memoized(Rc<CacheTableStore>),
}

impl Linkage {
    fn resolver_name(&self) -> &'static str {
        match self {
            Linkage::Constant => "link",
            Linkage::Memoized(_) => "memoize",
        }
    }
}

/// Outcome of one summation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FibReport<T> {
    pub total: T,
    /// Times the raw Fibonacci body was entered.
    pub raw_entries: u64,
    pub elapsed: Duration,
}

/// Plain recursive Fibonacci, counting entries in `entries`.
///
/// `None` if the result does not fit a `long`.
pub fn naive_fib(n: i64, entries: &mut u64) -> Option<i64> {
    *entries += 1;
    match n {
        0 | 1 => Some(n),
        _ => naive_fib(n - 1, entries)?.checked_add(naive_fib(n - 2, entries)?),
    }
}

/// Sum `fib(0..count)` with plain recursion.
pub fn sum_naive(count: u32) -> Result<FibReport<i64>, DemoError> {
    let start = Instant::now();
    let mut entries = 0;
    let mut total = 0_i64;
    for n in 0..i64::from(count) {
        total = naive_fib(n, &mut entries)
            .and_then(|fib| total.checked_add(fib))
            .ok_or_else(|| sum_overflow(count))?;
    }
    Ok(FibReport {
        total,
        raw_entries: entries,
        elapsed: start.elapsed(),
    })
}

fn sum_overflow(count: u32) -> DemoError {
    CallError::Invocation(InvocationError::failed(format!(
        "sum of fib(0..{count}) overflows long"
    )))
    .into()
}

/// A bound `fib` call site together with its raw-entry counter.
pub struct FibonacciSite {
    site: Rc<CallSite>,
    entries: Rc<Cell<u64>>,
}

impl FibonacciSite {
    /// `fib(long) -> long`.
    pub fn long(linkage: &Linkage) -> Result<Self, DemoError> {
        Self::bind(Signature::new([Type::Long], Type::Long), linkage, long_body)
    }

    /// `fib(bigint) -> bigint`.
    pub fn big(linkage: &Linkage) -> Result<Self, DemoError> {
        Self::bind(Signature::new([Type::BigInt], Type::BigInt), linkage, big_body)
    }

    fn bind(
        signature: Signature,
        linkage: &Linkage,
        body: fn(&MethodHandle, &[Value]) -> InvokeResult,
    ) -> Result<Self, DemoError> {
        let table = Rc::new(MemberTable::new());
        let entries = Rc::new(Cell::new(0));
        let forward = Forward::new("fib", signature.clone());

        let recurse = forward.invoker();
        let counter = Rc::clone(&entries);
        table.define_static(
            FIBONACCI,
            "fib",
            Visibility::Private,
            MethodHandle::new("fib", signature.clone(), move |args| {
                counter.set(counter.get() + 1);
                body(&recurse, args)
            }),
        );
        table.define_resolver(
            FIBONACCI,
            "link",
            from_fn(|lookup: &Lookup, descriptor: &OperationDescriptor, _: &[Value]| {
                lookup.find_static(FIBONACCI, descriptor.name(), descriptor.signature())
            }),
        );
        if let Linkage::Memoized(store) = linkage {
            table.define_resolver(FIBONACCI, "memoize", MemoizingResolver::new(Rc::clone(store)));
        }

        let registry = CallSiteRegistry::new(Lookup::new(table, FIBONACCI));
        let site = registry.bind(
            OperationDescriptor::new("fib", signature),
            ResolverDescriptor::new(FIBONACCI, linkage.resolver_name()),
        )?;
        forward.link(&site.dynamic_invoker())?;
        debug!(site = %site.descriptor(), linkage = linkage.resolver_name(), "fibonacci site bound");
        Ok(FibonacciSite { site, entries })
    }

    #[inline]
    pub fn site(&self) -> &Rc<CallSite> {
        &self.site
    }

    /// Times the raw body has been entered so far.
    pub fn raw_entries(&self) -> u64 {
        self.entries.get()
    }
}

fn long_body(recurse: &MethodHandle, args: &[Value]) -> InvokeResult {
    let n = args[0].as_long().ok_or_else(|| cast(Type::Long, &args[0]))?;
    match n {
        0 | 1 => Ok(Value::Long(n)),
        _ if n < 0 => Err(InvocationError::failed(format!("fib({n}): negative argument"))),
        _ => {
            let a = recurse.invoke_unchecked(&[Value::Long(n - 1)])?;
            let b = recurse.invoke_unchecked(&[Value::Long(n - 2)])?;
            let a = a.as_long().ok_or_else(|| cast(Type::Long, &a))?;
            let b = b.as_long().ok_or_else(|| cast(Type::Long, &b))?;
            a.checked_add(b)
                .map(Value::Long)
                .ok_or_else(|| InvocationError::failed(format!("fib({n}) overflows long")))
        }
    }
}

fn big_body(recurse: &MethodHandle, args: &[Value]) -> InvokeResult {
    let n = args[0].as_big().ok_or_else(|| cast(Type::BigInt, &args[0]))?;
    if n.is_zero() || n.is_one() {
        return Ok(args[0].clone());
    }
    if *n < BigInt::zero() {
        return Err(InvocationError::failed(format!("fib({n}): negative argument")));
    }
    let a = recurse.invoke_unchecked(&[Value::big(n - 1)])?;
    let b = recurse.invoke_unchecked(&[Value::big(n - 2)])?;
    match (a.as_big(), b.as_big()) {
        (Some(a), Some(b)) => Ok(Value::big(a + b)),
        (None, _) => Err(cast(Type::BigInt, &a)),
        (_, None) => Err(cast(Type::BigInt, &b)),
    }
}

fn cast(target: Type, value: &Value) -> InvocationError {
    InvocationError::ClassCast {
        target,
        got: value.type_name(),
    }
}

/// Sum `fib(0..count)` through a `long` call site.
pub fn sum_long(linkage: &Linkage, count: u32) -> Result<FibReport<i64>, DemoError> {
    let fib = FibonacciSite::long(linkage)?;
    let typed: TypedCallSite<(i64,), i64> = TypedCallSite::new(Rc::clone(fib.site()))?;

    let start = Instant::now();
    let mut total = 0_i64;
    for n in 0..i64::from(count) {
        total = total
            .checked_add(typed.call((n,))?)
            .ok_or_else(|| sum_overflow(count))?;
    }
    Ok(FibReport {
        total,
        raw_entries: fib.raw_entries(),
        elapsed: start.elapsed(),
    })
}

/// Sum `fib(0..count)` with big integers, memoized in `store`.
pub fn sum_big(store: &Rc<CacheTableStore>, count: u32) -> Result<FibReport<BigInt>, DemoError> {
    let fib = FibonacciSite::big(&Linkage::Memoized(Rc::clone(store)))?;
    let typed: TypedCallSite<(BigInt,), BigInt> = TypedCallSite::new(Rc::clone(fib.site()))?;

    let start = Instant::now();
    let mut total = BigInt::zero();
    for n in 0..count {
        total += typed.call((BigInt::from(n),))?;
    }
    Ok(FibReport {
        total,
        raw_entries: fib.raw_entries(),
        elapsed: start.elapsed(),
    })
}
