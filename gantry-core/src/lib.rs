//! Gantry core library — descriptor types, validation, derived names,
//! deploy policy.
//!
//! Public API surface:
//! - [`types`] — newtypes and domain structs
//! - [`validate`] — [`ValidatedDescriptor`] and the validation rules
//! - [`policy`] — [`DeployPolicy`] and its nested policy blocks
//! - [`error`] — [`ValidationError`], [`PolicyError`]

pub mod error;
pub mod policy;
pub mod types;
pub mod validate;

pub use error::{PolicyError, ValidationError};
pub use policy::DeployPolicy;
pub use types::{AppName, ApplicationDescriptor, DerivedNames, EnvVar};
pub use validate::ValidatedDescriptor;
