//! Error types for gantry-core.

use thiserror::Error;

/// All ways a descriptor can fail validation.
///
/// Validation failures are the caller's fault and recoverable by correcting
/// the input; they are never retried automatically.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was absent or empty.
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    /// A name is not usable as an identifier in the generated artifacts.
    #[error("invalid identifier in {field}: '{value}' ({reason})")]
    InvalidIdentifier {
        field: &'static str,
        value: String,
        reason: &'static str,
    },

    /// A port lies outside the permitted range.
    #[error("{field} out of range: {value} is not within {min}-{max}")]
    PortOutOfRange {
        field: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },

    /// Two environment variables share a name, or one shadows the reserved
    /// `PORT` build argument.
    #[error("duplicate environment variable name: {name}")]
    DuplicateEnvName { name: String },
}

/// Errors from loading a deploy policy document.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// YAML parse error.
    #[error("policy parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
}
