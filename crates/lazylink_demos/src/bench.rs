//! One arithmetic operation called through different dispatch paths.

use std::fmt;
use std::rc::Rc;
use std::time::{Duration, Instant};

use lazylink_bind::{
    from_fn, CallError, CallSite, CallSiteRegistry, Lookup, MemberTable, TypedCallSite,
    Visibility,
};
use lazylink_handle::{InvocationError, MethodHandle};
use lazylink_ir::{OperationDescriptor, OwnerType, ResolverDescriptor, Signature, Type, Value};
use tracing::debug;

use crate::DemoError;

pub const BENCH: OwnerType = OwnerType::new("DispatchBench");

/// Multiplier passed on every call.
pub const MULTIPLIER: i32 = 2;

pub fn sum_and_multiply(a: i64, b: i64, multiplier: i32) -> i64 {
    i64::from(multiplier) * (a + b)
}

/// Sum of `sum_and_multiply(x, y, MULTIPLIER)` over `x, y < loops`, or
/// `None` if it does not fit a `long`.
pub fn expected_total(loops: u32) -> Option<i64> {
    let l = i64::from(loops);
    i64::from(MULTIPLIER)
        .checked_mul(l)?
        .checked_mul(l)?
        .checked_mul((l - 1).max(0))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DispatchStyle {
    /// Plain Rust call.
    Direct,
    /// Through the site's dynamic invoker handle.
    DynamicInvoker,
    /// Through a [`TypedCallSite`].
    Typed,
    /// Look the target up by name on every call.
    PerCallLookup,
}

impl DispatchStyle {
    pub const ALL: [DispatchStyle; 4] = [
        DispatchStyle::DynamicInvoker,
        DispatchStyle::Typed,
        DispatchStyle::Direct,
        DispatchStyle::PerCallLookup,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DispatchStyle::Direct => "direct",
            DispatchStyle::DynamicInvoker => "dynamic invoker",
            DispatchStyle::Typed => "typed adapter",
            DispatchStyle::PerCallLookup => "per-call lookup",
        }
    }
}

impl fmt::Display for DispatchStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One timed run.
#[derive(Clone, Debug)]
pub struct Timing {
    pub style: DispatchStyle,
    pub total: i64,
    pub elapsed: Duration,
}

fn signature() -> Signature {
    Signature::new([Type::Long, Type::Long, Type::Int], Type::Long)
}

/// A bound `sum_and_multiply` site and the handles derived from it.
pub struct DispatchBench {
    lookup: Lookup,
    invoker: MethodHandle,
    typed: TypedCallSite<(i64, i64, i32), i64>,
}

impl DispatchBench {
    pub fn new() -> Result<Self, DemoError> {
        let table = Rc::new(MemberTable::new());
        table.define_static(
            BENCH,
            "sum_and_multiply",
            Visibility::Public,
            MethodHandle::new("sum_and_multiply", signature(), |args| {
                match (args[0].as_long(), args[1].as_long(), args[2].as_int()) {
                    (Some(a), Some(b), Some(m)) => Ok(Value::Long(sum_and_multiply(a, b, m))),
                    _ => Err(InvocationError::failed("sum_and_multiply: bad arguments")),
                }
            }),
        );
        table.define_resolver(
            BENCH,
            "link",
            from_fn(|lookup: &Lookup, descriptor: &OperationDescriptor, _: &[Value]| {
                lookup.find_static(BENCH, "sum_and_multiply", descriptor.signature())
            }),
        );

        let lookup = Lookup::new(table, BENCH);
        let registry = CallSiteRegistry::new(lookup.clone());
        let site: Rc<CallSite> = registry.bind(
            OperationDescriptor::new("run me", signature()),
            ResolverDescriptor::new(BENCH, "link"),
        )?;
        Ok(DispatchBench {
            lookup,
            invoker: site.dynamic_invoker(),
            typed: TypedCallSite::new(site)?,
        })
    }

    /// Sum `sum_and_multiply(x, y, MULTIPLIER)` over `x, y < loops`.
    ///
    /// Fails up front if the total would overflow a `long`.
    pub fn run(&self, style: DispatchStyle, loops: u32) -> Result<Timing, DemoError> {
        if expected_total(loops).is_none() {
            return Err(CallError::Invocation(InvocationError::failed(format!(
                "{loops} x {loops} bench total overflows long"
            )))
            .into());
        }
        let loops = i64::from(loops);
        let start = Instant::now();
        // Terms are non-negative, so every partial sum fits once the total does.
        let mut total = 0_i64;
        for x in 0..loops {
            for y in 0..loops {
                total += self.call(style, x, y)?;
            }
        }
        Ok(Timing {
            style,
            total,
            elapsed: start.elapsed(),
        })
    }

    fn call(&self, style: DispatchStyle, x: i64, y: i64) -> Result<i64, DemoError> {
        let boxed = || [Value::Long(x), Value::Long(y), Value::Int(MULTIPLIER)];
        let result = match style {
            DispatchStyle::Direct => return Ok(sum_and_multiply(x, y, MULTIPLIER)),
            DispatchStyle::Typed => return Ok(self.typed.call((x, y, MULTIPLIER))?),
            DispatchStyle::DynamicInvoker => self.invoker.invoke_unchecked(&boxed()),
            DispatchStyle::PerCallLookup => self
                .lookup
                .find_static(BENCH, "sum_and_multiply", &signature())?
                .invoke(&boxed()),
        };
        let value = result.map_err(CallError::from)?;
        value.as_long().ok_or_else(|| {
            DemoError::Call(
                InvocationError::ClassCast {
                    target: Type::Long,
                    got: value.type_name(),
                }
                .into(),
            )
        })
    }

    /// Run every style `repeats` times, in [`DispatchStyle::ALL`] order.
    pub fn run_all(&self, loops: u32, repeats: u32) -> Result<Vec<Timing>, DemoError> {
        let mut timings = Vec::new();
        for style in DispatchStyle::ALL {
            for repeat in 0..repeats {
                let timing = self.run(style, loops)?;
                debug!(%style, repeat, total = timing.total, elapsed = ?timing.elapsed, "bench run");
                timings.push(timing);
            }
        }
        Ok(timings)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests;
