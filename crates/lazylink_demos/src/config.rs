//! Demo configuration from the environment.

use std::str::FromStr;

use tracing::warn;

use crate::bench::expected_total;

/// Sizes and defaults for the demo commands.
///
/// Command-line arguments override these.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DemoConfig {
    /// Fibonacci numbers summed by `fib-sum` (`LAZYLINK_FIB_COUNT`).
    pub fib_count: u32,
    /// Fibonacci numbers summed by `fib-sum-big` (`LAZYLINK_BIG_FIB_COUNT`).
    pub big_fib_count: u32,
    /// Loop bound of each benchmark dimension (`LAZYLINK_BENCH_LOOPS`).
    /// Bounds whose benchmark total overflows a `long` are rejected.
    pub bench_loops: u32,
    /// Repetitions per dispatch style (`LAZYLINK_BENCH_REPEATS`).
    pub bench_repeats: u32,
    /// Default tag for `greet` (`LAZYLINK_GREETING_SUFFIX`).
    pub greeting_tag: Option<String>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        DemoConfig {
            fib_count: 40,
            big_fib_count: 3000,
            bench_loops: 10_000,
            bench_repeats: 5,
            greeting_tag: None,
        }
    }
}

impl DemoConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    ///
    /// Unparsable values are logged and replaced by the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = DemoConfig::default();
        DemoConfig {
            fib_count: parse_or(&lookup, "LAZYLINK_FIB_COUNT", defaults.fib_count),
            big_fib_count: parse_or(&lookup, "LAZYLINK_BIG_FIB_COUNT", defaults.big_fib_count),
            bench_loops: parse_within(
                &lookup,
                "LAZYLINK_BENCH_LOOPS",
                defaults.bench_loops,
                |loops| expected_total(loops).is_some(),
            ),
            bench_repeats: parse_or(&lookup, "LAZYLINK_BENCH_REPEATS", defaults.bench_repeats),
            greeting_tag: lookup("LAZYLINK_GREETING_SUFFIX").filter(|tag| !tag.is_empty()),
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            warn!(key, value = %raw, %default, "ignoring invalid setting");
            default
        }
    }
}

/// Like [`parse_or`], also falling back when `accept` rejects the value.
fn parse_within<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
    accept: impl Fn(T) -> bool,
) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    let value = parse_or(lookup, key, default);
    if accept(value) {
        value
    } else {
        warn!(key, %value, %default, "ignoring out-of-range setting");
        default
    }
}
