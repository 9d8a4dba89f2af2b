//! End-to-end tests for the `gantry` binary.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const ORDERS_API: &str = r#"name: orders-api
service_port: 8080
node_port: 30080
env:
  - name: DB_URL
    secret_id: db-url-secret
  - name: API_KEY
    secret_id: api-key-secret
"#;

fn write_descriptor(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("descriptor.yaml");
    std::fs::write(&path, contents).expect("write descriptor");
    path
}

fn gantry() -> Command {
    Command::cargo_bin("gantry").expect("binary")
}

#[test]
fn generate_writes_the_bundle() {
    let tmp = TempDir::new().unwrap();
    let descriptor = write_descriptor(tmp.path(), ORDERS_API);
    let out = tmp.path().join("out");

    gantry()
        .arg("generate")
        .arg(&descriptor)
        .arg("--out")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("orders-api"));

    assert!(out.join("Dockerfile").exists());
    assert!(out.join("Jenkinsfile").exists());
    assert!(out.join("k8s/orders-api-deployment.yaml").exists());
    assert!(out.join("k8s/orders-api-service.yaml").exists());
    assert!(out.join("k8s/orders-api-hpa.yaml").exists());
    assert!(out.join("k8s/orders-api-secret.yaml").exists());
}

#[test]
fn generate_dry_run_writes_nothing() {
    let tmp = TempDir::new().unwrap();
    let descriptor = write_descriptor(tmp.path(), ORDERS_API);
    let out = tmp.path().join("out");

    gantry()
        .arg("generate")
        .arg(&descriptor)
        .arg("--out")
        .arg(&out)
        .arg("--dry-run")
        .assert()
        .success();

    assert!(!out.exists(), "dry-run must not create the destination");
}

#[test]
fn generate_json_lists_bundle_paths() {
    let tmp = TempDir::new().unwrap();
    let descriptor = write_descriptor(tmp.path(), ORDERS_API);
    let out = tmp.path().join("out");

    let assert = gantry()
        .arg("generate")
        .arg(&descriptor)
        .arg("--out")
        .arg(&out)
        .arg("--json")
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let payload: serde_json::Value = serde_json::from_str(&stdout).expect("JSON output");
    assert_eq!(payload["app"], "orders-api");
    assert_eq!(payload["outcome"], "written");
    assert_eq!(payload["files"].as_array().unwrap().len(), 6);
}

#[test]
fn check_accepts_a_valid_descriptor() {
    let tmp = TempDir::new().unwrap();
    let descriptor = write_descriptor(tmp.path(), ORDERS_API);

    gantry()
        .arg("check")
        .arg(&descriptor)
        .assert()
        .success()
        .stdout(predicate::str::contains("is valid"));
}

#[test]
fn check_rejects_an_uppercase_name() {
    let tmp = TempDir::new().unwrap();
    let descriptor = write_descriptor(
        tmp.path(),
        "name: Orders-API\nservice_port: 8080\nnode_port: 30080\n",
    );

    gantry()
        .arg("check")
        .arg(&descriptor)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid identifier"));
}

#[test]
fn generate_refuses_duplicate_env_names() {
    let tmp = TempDir::new().unwrap();
    let descriptor = write_descriptor(
        tmp.path(),
        "name: dup\nservice_port: 8080\nnode_port: 30080\nenv:\n  - name: KEY\n    secret_id: a\n  - name: KEY\n    secret_id: b\n",
    );
    let out = tmp.path().join("out");

    gantry()
        .arg("generate")
        .arg(&descriptor)
        .arg("--out")
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("duplicate environment variable"));

    assert!(!out.exists(), "no partial artifacts on validation failure");
}

#[test]
fn diff_is_clean_after_generate() {
    let tmp = TempDir::new().unwrap();
    let descriptor = write_descriptor(tmp.path(), ORDERS_API);
    let out = tmp.path().join("out");

    gantry()
        .arg("generate")
        .arg(&descriptor)
        .arg("--out")
        .arg(&out)
        .assert()
        .success();

    gantry()
        .arg("diff")
        .arg(&descriptor)
        .arg("--out")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("already current"));
}

#[test]
fn policy_file_overrides_namespace() {
    let tmp = TempDir::new().unwrap();
    let descriptor = write_descriptor(tmp.path(), ORDERS_API);
    let policy = tmp.path().join("policy.yaml");
    std::fs::write(&policy, "namespace: staging\n").unwrap();
    let out = tmp.path().join("out");

    gantry()
        .arg("generate")
        .arg(&descriptor)
        .arg("--out")
        .arg(&out)
        .arg("--policy")
        .arg(&policy)
        .assert()
        .success();

    let deployment =
        std::fs::read_to_string(out.join("k8s/orders-api-deployment.yaml")).unwrap();
    assert!(deployment.contains("namespace: staging"));
}
