//! Render context — the serializable payload shared by every artifact
//! renderer.
//!
//! Every identifier an artifact may reference is computed exactly once here,
//! so the per-artifact renderers cannot disagree on a name.

use serde::Serialize;

use gantry_core::policy::DeployPolicy;
use gantry_core::types::DerivedNames;
use gantry_core::validate::ValidatedDescriptor;

use crate::engine::MANIFEST_DIR;
use crate::error::RenderError;

/// Flat rendering payload built from a validated descriptor plus the deploy
/// policy.
#[derive(Debug, Clone, Serialize)]
pub struct RenderContext {
    pub app_name: String,
    pub service_name: String,
    pub secret_name: String,
    pub hpa_name: String,
    pub image_placeholder: String,
    pub namespace: String,
    pub base_image: String,
    pub service_port: u32,
    pub node_port: u32,
    pub registry_host: String,
    pub registry_project: String,
    pub registry_credentials_id: String,
    pub kubeconfig_credentials_id: String,
    pub image_pull_secret: String,
    pub rollout_timeout_secs: u32,
    /// Bundle subdirectory the pipeline reads manifests from.
    pub manifest_dir: String,
    /// Descriptor order, preserved in every artifact that enumerates them.
    pub env_vars: Vec<EnvVarCtx>,
}

/// One environment variable with its precomputed reference spellings.
///
/// `build_arg_ref` is the `${NAME}` form used in the build file and secret
/// template; `shell_ref` is the `\${NAME}` form that survives Groovy string
/// escaping inside the pipeline's shell blocks.
#[derive(Debug, Clone, Serialize)]
pub struct EnvVarCtx {
    pub name: String,
    pub secret_id: String,
    pub build_arg_ref: String,
    pub shell_ref: String,
}

impl RenderContext {
    /// Build a [`RenderContext`] from a validated descriptor and policy.
    pub fn new(descriptor: &ValidatedDescriptor, policy: &DeployPolicy) -> Self {
        let d = descriptor.descriptor();
        let DerivedNames {
            service_name,
            secret_name,
            hpa_name,
            image_placeholder,
        } = descriptor.derived_names();

        let env_vars = d
            .env
            .iter()
            .map(|var| EnvVarCtx {
                name: var.name.clone(),
                secret_id: var.secret_id.clone(),
                build_arg_ref: format!("${{{}}}", var.name),
                shell_ref: format!("\\${{{}}}", var.name),
            })
            .collect();

        RenderContext {
            app_name: d.name.to_string(),
            service_name,
            secret_name,
            hpa_name,
            image_placeholder,
            namespace: policy.namespace.clone(),
            base_image: policy.base_image.clone(),
            service_port: d.service_port,
            node_port: d.node_port,
            registry_host: policy.registry.host.clone(),
            registry_project: policy.registry.project.clone(),
            registry_credentials_id: policy.registry.credentials_id.clone(),
            kubeconfig_credentials_id: policy.registry.kubeconfig_credentials_id.clone(),
            image_pull_secret: policy.registry.image_pull_secret.clone(),
            rollout_timeout_secs: policy.rollout_timeout_secs,
            manifest_dir: MANIFEST_DIR.to_owned(),
            env_vars,
        }
    }

    /// Convert to a [`tera::Context`] for the text-template renderers.
    pub fn to_tera_context(&self) -> Result<tera::Context, RenderError> {
        tera::Context::from_serialize(self).map_err(RenderError::from)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use gantry_core::types::{AppName, ApplicationDescriptor, EnvVar};

    use super::*;

    fn make_context(env: Vec<EnvVar>) -> RenderContext {
        let valid = ApplicationDescriptor {
            name: AppName::from("orders-api"),
            service_port: 8080,
            node_port: 30080,
            env,
        }
        .validate()
        .expect("validate");
        RenderContext::new(&valid, &DeployPolicy::default())
    }

    #[test]
    fn derived_names_populated() {
        let ctx = make_context(vec![]);
        assert_eq!(ctx.app_name, "orders-api");
        assert_eq!(ctx.service_name, "orders-api-service");
        assert_eq!(ctx.secret_name, "orders-api-secret");
        assert_eq!(ctx.hpa_name, "orders-api-hpa");
        assert_eq!(ctx.image_placeholder, "${FULL_IMAGE_NAME}");
    }

    #[test]
    fn env_reference_spellings() {
        let ctx = make_context(vec![EnvVar {
            name: "DB_URL".to_owned(),
            secret_id: "db-url-secret".to_owned(),
        }]);
        let var = &ctx.env_vars[0];
        assert_eq!(var.build_arg_ref, "${DB_URL}");
        assert_eq!(var.shell_ref, "\\${DB_URL}");
    }

    #[test]
    fn env_order_is_preserved() {
        let ctx = make_context(vec![
            EnvVar {
                name: "ZEBRA".to_owned(),
                secret_id: "z".to_owned(),
            },
            EnvVar {
                name: "ALPHA".to_owned(),
                secret_id: "a".to_owned(),
            },
        ]);
        let names: Vec<&str> = ctx.env_vars.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, ["ZEBRA", "ALPHA"]);
    }

    #[test]
    fn to_tera_context_succeeds() {
        let ctx = make_context(vec![]);
        ctx.to_tera_context().expect("context conversion");
    }
}
