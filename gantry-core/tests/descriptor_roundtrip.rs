//! Descriptor document parsing against the documented input shape.

use gantry_core::{ApplicationDescriptor, ValidationError};

const ORDERS_API: &str = r#"
name: orders-api
service_port: 8080
node_port: 30080
env:
  - name: DB_URL
    secret_id: db-url-secret
  - name: API_KEY
    secret_id: api-key-secret
"#;

#[test]
fn reference_descriptor_parses_and_validates() {
    let descriptor: ApplicationDescriptor =
        serde_yaml::from_str(ORDERS_API).expect("descriptor should parse");
    assert_eq!(descriptor.env.len(), 2);
    assert_eq!(descriptor.env[0].name, "DB_URL");
    assert_eq!(descriptor.env[1].secret_id, "api-key-secret");

    let valid = descriptor.validate().expect("descriptor should validate");
    let names = valid.derived_names();
    assert_eq!(names.service_name, "orders-api-service");
    assert_eq!(names.hpa_name, "orders-api-hpa");
}

#[test]
fn serialized_descriptor_parses_back() {
    let descriptor: ApplicationDescriptor = serde_yaml::from_str(ORDERS_API).expect("parse");
    let yaml = serde_yaml::to_string(&descriptor).expect("serialize");
    let back: ApplicationDescriptor = serde_yaml::from_str(&yaml).expect("reparse");
    assert_eq!(descriptor, back);
}

#[test]
fn uppercase_name_fails_before_any_rendering_concern() {
    let descriptor: ApplicationDescriptor = serde_yaml::from_str(
        "name: Orders-API\nservice_port: 8080\nnode_port: 30080\n",
    )
    .expect("parse");
    let err = descriptor.validate().expect_err("should fail validation");
    assert!(matches!(
        err,
        ValidationError::InvalidIdentifier { field: "name", .. }
    ));
}
