//! Error types for gantry-emit.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from bundle writing and diffing.
#[derive(Debug, Error)]
pub enum EmitError {
    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`EmitError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> EmitError {
    EmitError::Io {
        path: path.into(),
        source,
    }
}
