//! Callers of the lazylink core.
//!
//! Each module binds its operations through a `CallSiteRegistry` and
//! invokes the resulting sites; none of them add machinery of their own.
//!
//! - [`fibonacci`]: naive, call-site and memoized Fibonacci sums
//! - [`greeting`]: a resolver choosing its target from a static tag
//! - [`lazy_constant`]: a resource parsed only when first needed
//! - [`bench`]: dispatch styles for one small arithmetic operation
//!
//! [`DemoConfig`] reads defaults from the environment and
//! [`init_tracing`] installs the log subscriber used by the binary.

pub mod bench;
mod config;
mod errors;
pub mod fibonacci;
pub mod greeting;
pub mod lazy_constant;
mod report;
mod tracing_setup;

pub use config::DemoConfig;
pub use errors::{DemoError, ResourceError};
pub use report::group_digits;
pub use tracing_setup::init_tracing;
