//! Descriptor validation.
//!
//! Validation runs before any rendering. Renderers accept
//! [`ValidatedDescriptor`] only, so a descriptor that skipped validation
//! cannot reach them and rendering never re-validates.

use std::collections::HashSet;

use crate::error::ValidationError;
use crate::types::{ApplicationDescriptor, DerivedNames};

/// Inclusive range for the container listening port.
pub const SERVICE_PORT_RANGE: (u32, u32) = (1, 65535);

/// Inclusive range the orchestrator reserves for node ports.
pub const NODE_PORT_RANGE: (u32, u32) = (30000, 32767);

/// Build argument the container build file always declares. A descriptor
/// environment variable of this name would collide in the build-argument set.
pub const RESERVED_PORT_ARG: &str = "PORT";

/// A descriptor that has passed [`ApplicationDescriptor::validate`].
///
/// Immutable; the only way to obtain one is through `validate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedDescriptor {
    inner: ApplicationDescriptor,
}

impl ValidatedDescriptor {
    /// The underlying descriptor fields.
    pub fn descriptor(&self) -> &ApplicationDescriptor {
        &self.inner
    }

    /// Compute the derived name set for this descriptor.
    pub fn derived_names(&self) -> DerivedNames {
        DerivedNames::derive(&self.inner.name)
    }
}

impl ApplicationDescriptor {
    /// Validate field presence, identifier shape, and port ranges.
    ///
    /// Checks run in declaration order and stop at the first failure, so the
    /// reported field is always the first offending one.
    pub fn validate(self) -> Result<ValidatedDescriptor, ValidationError> {
        check_app_name(&self.name.0)?;
        check_port("service_port", self.service_port, SERVICE_PORT_RANGE)?;
        check_port("node_port", self.node_port, NODE_PORT_RANGE)?;

        let mut seen: HashSet<&str> = HashSet::with_capacity(self.env.len());
        for var in &self.env {
            check_env_name(&var.name)?;
            if var.secret_id.is_empty() {
                return Err(ValidationError::MissingField {
                    field: "env.secret_id",
                });
            }
            if var.name == RESERVED_PORT_ARG || !seen.insert(var.name.as_str()) {
                return Err(ValidationError::DuplicateEnvName {
                    name: var.name.clone(),
                });
            }
        }

        Ok(ValidatedDescriptor { inner: self })
    }
}

/// DNS-label shape: lowercase alphanumerics and hyphens, alphanumeric at both
/// ends, at most 63 characters.
fn check_app_name(name: &str) -> Result<(), ValidationError> {
    let invalid = |reason| ValidationError::InvalidIdentifier {
        field: "name",
        value: name.to_owned(),
        reason,
    };

    if name.is_empty() {
        return Err(ValidationError::MissingField { field: "name" });
    }
    if name.len() > 63 {
        return Err(invalid("longer than 63 characters"));
    }
    if !name
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
    {
        return Err(invalid(
            "only lowercase alphanumerics and hyphens are allowed",
        ));
    }
    if name.starts_with('-') || name.ends_with('-') {
        return Err(invalid("must start and end with an alphanumeric"));
    }
    Ok(())
}

/// Environment variable names double as build-argument names, so they must be
/// shaped like POSIX identifiers.
fn check_env_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::MissingField { field: "env.name" });
    }
    let mut bytes = name.bytes();
    let head_ok = bytes
        .next()
        .map(|b| b.is_ascii_alphabetic() || b == b'_')
        .unwrap_or(false);
    if !head_ok || !bytes.all(|b| b.is_ascii_alphanumeric() || b == b'_') {
        return Err(ValidationError::InvalidIdentifier {
            field: "env.name",
            value: name.to_owned(),
            reason: "must match [A-Za-z_][A-Za-z0-9_]*",
        });
    }
    Ok(())
}

fn check_port(
    field: &'static str,
    value: u32,
    (min, max): (u32, u32),
) -> Result<(), ValidationError> {
    if value < min || value > max {
        return Err(ValidationError::PortOutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::types::{AppName, EnvVar};

    fn descriptor(name: &str, env: Vec<EnvVar>) -> ApplicationDescriptor {
        ApplicationDescriptor {
            name: AppName::from(name),
            service_port: 8080,
            node_port: 30080,
            env,
        }
    }

    fn env(name: &str, secret_id: &str) -> EnvVar {
        EnvVar {
            name: name.to_owned(),
            secret_id: secret_id.to_owned(),
        }
    }

    #[test]
    fn valid_descriptor_passes() {
        let valid = descriptor("orders-api", vec![env("DB_URL", "db-url-secret")])
            .validate()
            .expect("should validate");
        assert_eq!(valid.descriptor().name.to_string(), "orders-api");
        assert_eq!(valid.derived_names().secret_name, "orders-api-secret");
    }

    #[test]
    fn empty_env_list_is_valid() {
        descriptor("solo", vec![]).validate().expect("should validate");
    }

    #[test]
    fn empty_name_is_missing_field() {
        let err = descriptor("", vec![]).validate().unwrap_err();
        assert_eq!(err, ValidationError::MissingField { field: "name" });
    }

    #[rstest]
    #[case("Orders-Api")]
    #[case("orders_api")]
    #[case("orders.api")]
    #[case("-orders")]
    #[case("orders-")]
    fn malformed_names_are_rejected(#[case] name: &str) {
        let err = descriptor(name, vec![]).validate().unwrap_err();
        assert!(
            matches!(err, ValidationError::InvalidIdentifier { field: "name", .. }),
            "expected InvalidIdentifier for '{name}', got {err:?}"
        );
    }

    #[test]
    fn overlong_name_is_rejected() {
        let name = "a".repeat(64);
        let err = descriptor(&name, vec![]).validate().unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidIdentifier { field: "name", .. }
        ));
    }

    #[rstest]
    #[case(0)]
    #[case(65536)]
    fn service_port_out_of_range(#[case] port: u32) {
        let mut d = descriptor("app", vec![]);
        d.service_port = port;
        let err = d.validate().unwrap_err();
        assert!(matches!(
            err,
            ValidationError::PortOutOfRange {
                field: "service_port",
                ..
            }
        ));
    }

    #[rstest]
    #[case(29999)]
    #[case(32768)]
    #[case(8080)]
    fn node_port_out_of_range(#[case] port: u32) {
        let mut d = descriptor("app", vec![]);
        d.node_port = port;
        let err = d.validate().unwrap_err();
        assert_eq!(
            err,
            ValidationError::PortOutOfRange {
                field: "node_port",
                value: port,
                min: 30000,
                max: 32767,
            }
        );
    }

    #[test]
    fn duplicate_env_names_are_rejected() {
        let err = descriptor(
            "app",
            vec![env("DB_URL", "a-secret"), env("DB_URL", "b-secret")],
        )
        .validate()
        .unwrap_err();
        assert_eq!(
            err,
            ValidationError::DuplicateEnvName {
                name: "DB_URL".to_owned()
            }
        );
    }

    #[test]
    fn env_named_port_shadows_reserved_build_arg() {
        let err = descriptor("app", vec![env("PORT", "port-secret")])
            .validate()
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::DuplicateEnvName {
                name: "PORT".to_owned()
            }
        );
    }

    #[rstest]
    #[case("1DB_URL")]
    #[case("DB-URL")]
    #[case("DB URL")]
    fn malformed_env_names_are_rejected(#[case] name: &str) {
        let err = descriptor("app", vec![env(name, "a-secret")])
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidIdentifier {
                field: "env.name",
                ..
            }
        ));
    }

    #[test]
    fn empty_env_name_is_missing_field() {
        let err = descriptor("app", vec![env("", "a-secret")])
            .validate()
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingField { field: "env.name" });
    }

    #[test]
    fn empty_secret_id_is_missing_field() {
        let err = descriptor("app", vec![env("DB_URL", "")])
            .validate()
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingField {
                field: "env.secret_id"
            }
        );
    }

    #[test]
    fn first_failure_wins() {
        // Bad name and bad port together: the name check runs first.
        let mut d = descriptor("Bad_Name", vec![]);
        d.node_port = 1;
        let err = d.validate().unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidIdentifier { field: "name", .. }
        ));
    }
}
