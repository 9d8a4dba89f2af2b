//! Typed orchestration manifest models.
//!
//! One struct per manifest kind, all serialized through the single
//! [`to_yaml`] encoder. Struct field order is the field order of the emitted
//! document, and `stringData` uses [`serde_yaml::Mapping`] so secret entries
//! keep descriptor order.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_yaml::Mapping;

use gantry_core::policy::DeployPolicy;

use crate::context::RenderContext;
use crate::error::RenderError;

/// Serialize any manifest model to a YAML document.
pub fn to_yaml<T: Serialize>(doc: &T) -> Result<String, RenderError> {
    serde_yaml::to_string(doc).map_err(RenderError::from)
}

// ---------------------------------------------------------------------------
// Shared pieces
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct Metadata {
    pub name: String,
    pub namespace: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NameRef {
    pub name: String,
}

fn app_labels(app_name: &str) -> BTreeMap<String, String> {
    BTreeMap::from([("app".to_owned(), app_name.to_owned())])
}

// ---------------------------------------------------------------------------
// Workload (Deployment)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentManifest {
    pub api_version: String,
    pub kind: String,
    pub metadata: Metadata,
    pub spec: DeploymentSpec,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentSpec {
    pub replicas: u32,
    pub selector: Selector,
    pub template: PodTemplate,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Selector {
    pub match_labels: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PodTemplate {
    pub metadata: TemplateMetadata,
    pub spec: PodSpec,
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplateMetadata {
    pub labels: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PodSpec {
    pub containers: Vec<Container>,
    pub image_pull_secrets: Vec<NameRef>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    pub name: String,
    pub image: String,
    pub image_pull_policy: String,
    pub ports: Vec<ContainerPort>,
    pub env_from: Vec<EnvFromSource>,
    pub resources: Resources,
    pub liveness_probe: Probe,
    pub readiness_probe: Probe,
    pub security_context: SecurityContext,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerPort {
    pub container_port: u32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvFromSource {
    pub secret_ref: NameRef,
}

#[derive(Debug, Clone, Serialize)]
pub struct Resources {
    pub requests: BTreeMap<String, String>,
    pub limits: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Probe {
    pub http_get: HttpGet,
    pub initial_delay_seconds: u32,
    pub period_seconds: u32,
    pub timeout_seconds: u32,
    pub failure_threshold: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct HttpGet {
    pub path: String,
    /// Named container port, not a number.
    pub port: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityContext {
    pub run_as_non_root: bool,
    pub run_as_user: u32,
    pub allow_privilege_escalation: bool,
    pub read_only_root_filesystem: bool,
    pub capabilities: Capabilities,
}

#[derive(Debug, Clone, Serialize)]
pub struct Capabilities {
    pub drop: Vec<String>,
}

impl DeploymentManifest {
    /// Build the workload manifest. Exactly one container; environment comes
    /// from the derived secret as a bulk source, never per-variable.
    pub fn new(ctx: &RenderContext, policy: &DeployPolicy) -> Self {
        let probe = |p: &gantry_core::policy::ProbePolicy| Probe {
            http_get: HttpGet {
                path: format!("/{}", ctx.app_name),
                port: "http".to_owned(),
            },
            initial_delay_seconds: p.initial_delay_secs,
            period_seconds: p.period_secs,
            timeout_seconds: p.timeout_secs,
            failure_threshold: p.failure_threshold,
        };

        DeploymentManifest {
            api_version: "apps/v1".to_owned(),
            kind: "Deployment".to_owned(),
            metadata: Metadata {
                name: ctx.app_name.clone(),
                namespace: ctx.namespace.clone(),
                labels: Some(app_labels(&ctx.app_name)),
            },
            spec: DeploymentSpec {
                replicas: 1,
                selector: Selector {
                    match_labels: app_labels(&ctx.app_name),
                },
                template: PodTemplate {
                    metadata: TemplateMetadata {
                        labels: app_labels(&ctx.app_name),
                    },
                    spec: PodSpec {
                        containers: vec![Container {
                            name: ctx.app_name.clone(),
                            image: ctx.image_placeholder.clone(),
                            image_pull_policy: "Always".to_owned(),
                            ports: vec![ContainerPort {
                                container_port: ctx.service_port,
                                name: "http".to_owned(),
                            }],
                            env_from: vec![EnvFromSource {
                                secret_ref: NameRef {
                                    name: ctx.secret_name.clone(),
                                },
                            }],
                            resources: Resources {
                                requests: BTreeMap::from([
                                    ("cpu".to_owned(), policy.resources.request_cpu.clone()),
                                    ("memory".to_owned(), policy.resources.request_memory.clone()),
                                ]),
                                limits: BTreeMap::from([
                                    ("cpu".to_owned(), policy.resources.limit_cpu.clone()),
                                    ("memory".to_owned(), policy.resources.limit_memory.clone()),
                                ]),
                            },
                            liveness_probe: probe(&policy.liveness),
                            readiness_probe: probe(&policy.readiness),
                            security_context: SecurityContext {
                                run_as_non_root: true,
                                run_as_user: 1000,
                                allow_privilege_escalation: false,
                                read_only_root_filesystem: true,
                                capabilities: Capabilities {
                                    drop: vec!["ALL".to_owned()],
                                },
                            },
                        }],
                        image_pull_secrets: vec![NameRef {
                            name: ctx.image_pull_secret.clone(),
                        }],
                    },
                },
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceManifest {
    pub api_version: String,
    pub kind: String,
    pub metadata: Metadata,
    pub spec: ServiceSpec,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceSpec {
    #[serde(rename = "type")]
    pub service_type: String,
    pub selector: BTreeMap<String, String>,
    pub ports: Vec<ServicePort>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePort {
    pub protocol: String,
    pub port: u32,
    pub target_port: u32,
    pub node_port: u32,
}

impl ServiceManifest {
    /// Build the service manifest: the service port doubles as the target
    /// port, exposed externally on the validated node port.
    pub fn new(ctx: &RenderContext) -> Self {
        ServiceManifest {
            api_version: "v1".to_owned(),
            kind: "Service".to_owned(),
            metadata: Metadata {
                name: ctx.service_name.clone(),
                namespace: ctx.namespace.clone(),
                labels: None,
            },
            spec: ServiceSpec {
                service_type: "NodePort".to_owned(),
                selector: app_labels(&ctx.app_name),
                ports: vec![ServicePort {
                    protocol: "TCP".to_owned(),
                    port: ctx.service_port,
                    target_port: ctx.service_port,
                    node_port: ctx.node_port,
                }],
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Autoscaler
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HpaManifest {
    pub api_version: String,
    pub kind: String,
    pub metadata: Metadata,
    pub spec: HpaSpec,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HpaSpec {
    pub scale_target_ref: ScaleTargetRef,
    pub min_replicas: u32,
    pub max_replicas: u32,
    pub metrics: Vec<Metric>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleTargetRef {
    pub api_version: String,
    pub kind: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Metric {
    #[serde(rename = "type")]
    pub metric_type: String,
    pub resource: ResourceMetric,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResourceMetric {
    pub name: String,
    pub target: MetricTarget,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricTarget {
    #[serde(rename = "type")]
    pub target_type: String,
    pub average_utilization: u32,
}

impl HpaManifest {
    /// Build the autoscaler manifest targeting the workload by name.
    pub fn new(ctx: &RenderContext, policy: &DeployPolicy) -> Self {
        HpaManifest {
            api_version: "autoscaling/v2".to_owned(),
            kind: "HorizontalPodAutoscaler".to_owned(),
            metadata: Metadata {
                name: ctx.hpa_name.clone(),
                namespace: ctx.namespace.clone(),
                labels: None,
            },
            spec: HpaSpec {
                scale_target_ref: ScaleTargetRef {
                    api_version: "apps/v1".to_owned(),
                    kind: "Deployment".to_owned(),
                    name: ctx.app_name.clone(),
                },
                min_replicas: policy.autoscale.min_replicas,
                max_replicas: policy.autoscale.max_replicas,
                metrics: vec![Metric {
                    metric_type: "Resource".to_owned(),
                    resource: ResourceMetric {
                        name: "cpu".to_owned(),
                        target: MetricTarget {
                            target_type: "Utilization".to_owned(),
                            average_utilization: policy.autoscale.target_cpu_utilization,
                        },
                    },
                }],
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Secret template
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretManifest {
    pub api_version: String,
    pub kind: String,
    pub metadata: Metadata,
    #[serde(rename = "type")]
    pub secret_type: String,
    pub string_data: Mapping,
}

impl SecretManifest {
    /// Build the secret template. Values are `${NAME}` placeholders for
    /// deploy-time substitution; the namespace is itself a placeholder. The
    /// generator never sees real secret values.
    pub fn new(ctx: &RenderContext) -> Self {
        let mut string_data = Mapping::new();
        for var in &ctx.env_vars {
            string_data.insert(var.name.clone().into(), var.build_arg_ref.clone().into());
        }

        SecretManifest {
            api_version: "v1".to_owned(),
            kind: "Secret".to_owned(),
            metadata: Metadata {
                name: ctx.secret_name.clone(),
                namespace: "${NAMESPACE}".to_owned(),
                labels: None,
            },
            secret_type: "Opaque".to_owned(),
            string_data,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
