//! Domain types for gantry descriptors.
//!
//! The application name is embedded verbatim into manifest labels, selectors,
//! and file names, so it is a newtype rather than a bare `String`. All types
//! are serializable/deserializable via serde + serde_yaml.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed application name (DNS-label shaped once validated).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AppName(pub String);

impl fmt::Display for AppName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for AppName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for AppName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// One secret-backed environment variable.
///
/// `secret_id` is an opaque reference into the external secret store; it is
/// carried through to the pipeline's credential bindings and never resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVar {
    pub name: String,
    pub secret_id: String,
}

/// Caller-supplied specification of one application to generate artifacts for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationDescriptor {
    pub name: AppName,
    /// The container's listening port (1–65535).
    pub service_port: u32,
    /// The externally exposed node port (30000–32767).
    pub node_port: u32,
    /// Ordered; order is preserved in every artifact that enumerates them.
    #[serde(default)]
    pub env: Vec<EnvVar>,
}

/// Names computed from the application name, used consistently across every
/// artifact that references them. Never supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivedNames {
    pub service_name: String,
    pub secret_name: String,
    pub hpa_name: String,
    /// Substituted with the pushed image reference at deploy time.
    pub image_placeholder: String,
}

impl DerivedNames {
    /// Derive the full name set for `name`. Pure and deterministic: the
    /// pipeline and the manifests must agree on these byte-for-byte.
    pub fn derive(name: &AppName) -> Self {
        DerivedNames {
            service_name: format!("{name}-service"),
            secret_name: format!("{name}-secret"),
            hpa_name: format!("{name}-hpa"),
            image_placeholder: "${FULL_IMAGE_NAME}".to_owned(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newtype_display() {
        assert_eq!(AppName::from("orders-api").to_string(), "orders-api");
    }

    #[test]
    fn newtype_equality() {
        let a = AppName::from("x");
        let b = AppName::from(String::from("x"));
        assert_eq!(a, b);
    }

    #[test]
    fn derived_names_format() {
        let names = DerivedNames::derive(&AppName::from("orders-api"));
        assert_eq!(names.service_name, "orders-api-service");
        assert_eq!(names.secret_name, "orders-api-secret");
        assert_eq!(names.hpa_name, "orders-api-hpa");
        assert_eq!(names.image_placeholder, "${FULL_IMAGE_NAME}");
    }

    #[test]
    fn derive_is_deterministic() {
        let name = AppName::from("billing");
        assert_eq!(DerivedNames::derive(&name), DerivedNames::derive(&name));
    }

    #[test]
    fn descriptor_yaml_roundtrip() {
        let descriptor = ApplicationDescriptor {
            name: AppName::from("orders-api"),
            service_port: 8080,
            node_port: 30080,
            env: vec![EnvVar {
                name: "DB_URL".to_owned(),
                secret_id: "db-url-secret".to_owned(),
            }],
        };
        let yaml = serde_yaml::to_string(&descriptor).expect("serialize");
        let back: ApplicationDescriptor = serde_yaml::from_str(&yaml).expect("deserialize");
        assert_eq!(descriptor, back);
    }

    #[test]
    fn env_defaults_to_empty() {
        let descriptor: ApplicationDescriptor =
            serde_yaml::from_str("name: solo\nservice_port: 3000\nnode_port: 30100\n")
                .expect("deserialize");
        assert!(descriptor.env.is_empty());
    }
}
