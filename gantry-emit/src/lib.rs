//! # gantry-emit
//!
//! Full-replace bundle writer and destination diffing.
//!
//! Call [`write_bundle`] to persist a rendered [`ArtifactBundle`] to a
//! destination directory, or [`diff_bundle`] to see what a write would
//! change without touching anything.
//!
//! [`ArtifactBundle`]: gantry_renderer::ArtifactBundle

pub mod diff;
pub mod error;
pub mod writer;

pub use diff::{diff_bundle, BundleDiff, DiffStatus, FileDiff};
pub use error::EmitError;
pub use writer::{write_bundle, EmitOutcome, EmitReport};
