//! Error types for gantry-renderer.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from artifact rendering.
///
/// Unlike a `ValidationError`, any of these indicates a generator defect or
/// broken template override, not a bad descriptor.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Tera template engine error.
    #[error("template engine error: {0}")]
    Template(#[from] tera::Error),

    /// YAML encoding error while serializing a manifest model.
    #[error("manifest encoding error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Filesystem error while loading user template overrides.
    #[error("template io error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Two renderers produced the same bundle path.
    #[error("duplicate artifact path in bundle: {path}")]
    DuplicateArtifact { path: PathBuf },
}
