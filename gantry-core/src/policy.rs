//! Deployment policy constants.
//!
//! Everything here is configuration rather than descriptor data: the same
//! policy applies to every application the generator renders. Defaults
//! reproduce the production constants; a YAML policy file can override the
//! top-level blocks it names and inherit the rest.

use serde::{Deserialize, Serialize};

use crate::error::PolicyError;

/// Fixed deployment policy shared by every rendered artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeployPolicy {
    /// Namespace every manifest is pinned to.
    pub namespace: String,
    /// Base image for the container build file.
    pub base_image: String,
    pub registry: RegistryPolicy,
    pub resources: ResourcePolicy,
    pub liveness: ProbePolicy,
    pub readiness: ProbePolicy,
    pub autoscale: AutoscalePolicy,
    /// How long the pipeline waits for the workload rollout.
    pub rollout_timeout_secs: u32,
}

impl Default for DeployPolicy {
    fn default() -> Self {
        DeployPolicy {
            namespace: "apps".to_owned(),
            base_image: "node:20-slim".to_owned(),
            registry: RegistryPolicy::default(),
            resources: ResourcePolicy::default(),
            liveness: ProbePolicy {
                initial_delay_secs: 30,
                period_secs: 10,
                timeout_secs: 5,
                failure_threshold: 3,
            },
            readiness: ProbePolicy {
                initial_delay_secs: 5,
                period_secs: 5,
                timeout_secs: 3,
                failure_threshold: 3,
            },
            autoscale: AutoscalePolicy::default(),
            rollout_timeout_secs: 120,
        }
    }
}

impl DeployPolicy {
    /// Parse a policy document, filling unspecified blocks with defaults.
    pub fn from_yaml_str(contents: &str) -> Result<Self, PolicyError> {
        Ok(serde_yaml::from_str(contents)?)
    }
}

/// Container registry coordinates and the pipeline credential identifiers
/// used to reach it. Credential identifiers are opaque, like descriptor
/// `secret_id`s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryPolicy {
    pub host: String,
    pub project: String,
    pub credentials_id: String,
    pub kubeconfig_credentials_id: String,
    /// Name of the image-pull secret the pipeline recreates on deploy.
    pub image_pull_secret: String,
}

impl Default for RegistryPolicy {
    fn default() -> Self {
        RegistryPolicy {
            host: "registry.local".to_owned(),
            project: "apps".to_owned(),
            credentials_id: "registry-credentials".to_owned(),
            kubeconfig_credentials_id: "kubeconfig-deploy".to_owned(),
            image_pull_secret: "registry-pull-secret".to_owned(),
        }
    }
}

/// Resource requests and limits for the single workload container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourcePolicy {
    pub request_cpu: String,
    pub request_memory: String,
    pub limit_cpu: String,
    pub limit_memory: String,
}

impl Default for ResourcePolicy {
    fn default() -> Self {
        ResourcePolicy {
            request_cpu: "200m".to_owned(),
            request_memory: "256Mi".to_owned(),
            limit_cpu: "1000m".to_owned(),
            limit_memory: "1Gi".to_owned(),
        }
    }
}

/// Probe timings, independently tunable per probe type. Liveness and
/// readiness carry different defaults, so this struct has no `Default` of
/// its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbePolicy {
    pub initial_delay_secs: u32,
    pub period_secs: u32,
    pub timeout_secs: u32,
    pub failure_threshold: u32,
}

/// Autoscaler bounds and target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoscalePolicy {
    pub min_replicas: u32,
    pub max_replicas: u32,
    pub target_cpu_utilization: u32,
}

impl Default for AutoscalePolicy {
    fn default() -> Self {
        AutoscalePolicy {
            min_replicas: 1,
            max_replicas: 5,
            target_cpu_utilization: 50,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
