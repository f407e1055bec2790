//! Demo error types.

use std::path::PathBuf;

use lazylink_bind::{CallError, ResolutionError};
use lazylink_memo::LinkError;

/// Any failure a demo can report.
#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    #[error(transparent)]
    Call(#[from] CallError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Link(#[from] LinkError),

    #[error(transparent)]
    Resource(#[from] ResourceError),
}

/// A notes resource could not be read or parsed.
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed document at byte {offset}: {message}")]
    Malformed { offset: usize, message: &'static str },
}
