//! Artifact renderers — [`ArtifactKind`] enum and [`Renderer`].
//!
//! # Bundle layout
//!
//! | Artifact             | Bundle path                  |
//! |----------------------|------------------------------|
//! | Container build file | `Dockerfile`                 |
//! | Workload manifest    | `k8s/<name>-deployment.yaml` |
//! | Service manifest     | `k8s/<name>-service.yaml`    |
//! | Autoscaler manifest  | `k8s/<name>-hpa.yaml`        |
//! | Secret template      | `k8s/<name>-secret.yaml`     |
//! | Delivery pipeline    | `Jenkinsfile`                |
//!
//! The pipeline's deploy loop reads `k8s/<name>-{deployment,service,hpa}.yaml`,
//! so manifest file names and pipeline text must come from the same place:
//! [`ArtifactKind::bundle_path`] and the shared render context.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tera::Tera;

use gantry_core::policy::DeployPolicy;
use gantry_core::validate::ValidatedDescriptor;

use crate::bundle::ArtifactBundle;
use crate::context::RenderContext;
use crate::error::RenderError;
use crate::manifest::{
    self, DeploymentManifest, HpaManifest, SecretManifest, ServiceManifest,
};

/// Bundle subdirectory holding the manifests and the secret template.
pub const MANIFEST_DIR: &str = "k8s";

// ---------------------------------------------------------------------------
// Embedded templates — baked into the binary at compile time via include_str!
// ---------------------------------------------------------------------------

const TPLS: &[(&str, &str)] = &[
    ("dockerfile.tera", include_str!("templates/dockerfile.tera")),
    ("jenkinsfile.tera", include_str!("templates/jenkinsfile.tera")),
];

fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RenderError {
    RenderError::Io {
        path: path.into(),
        source,
    }
}

/// `.tera` files directly inside `dir`, keyed by lowercased file name.
fn load_user_templates(dir: &Path) -> Result<Vec<(String, String)>, RenderError> {
    if !dir.exists() {
        return Ok(vec![]);
    }
    let mut templates = Vec::new();
    let entries = std::fs::read_dir(dir).map_err(|e| io_err(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) != Some("tera") {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_lowercase();
        let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
        templates.push((name, contents));
    }
    Ok(templates)
}

fn build_tera(user_template_dir: Option<&Path>) -> Result<Tera, RenderError> {
    let mut templates: HashMap<String, String> = HashMap::new();
    for (name, content) in TPLS {
        templates.insert((*name).to_owned(), (*content).to_owned());
    }
    if let Some(dir) = user_template_dir {
        for (name, content) in load_user_templates(dir)? {
            templates.insert(name, content);
        }
    }

    let mut tera = Tera::default();
    let items: Vec<(String, String)> = templates.into_iter().collect();
    tera.add_raw_templates(items)?;
    Ok(tera)
}

// ---------------------------------------------------------------------------
// ArtifactKind
// ---------------------------------------------------------------------------

/// The six artifacts of a generation bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Dockerfile,
    DeploymentManifest,
    ServiceManifest,
    AutoscalerManifest,
    SecretTemplate,
    Jenkinsfile,
}

impl ArtifactKind {
    /// All artifact kinds in bundle order.
    pub fn all() -> &'static [ArtifactKind] {
        &[
            ArtifactKind::Dockerfile,
            ArtifactKind::DeploymentManifest,
            ArtifactKind::ServiceManifest,
            ArtifactKind::AutoscalerManifest,
            ArtifactKind::SecretTemplate,
            ArtifactKind::Jenkinsfile,
        ]
    }

    /// Bundle-relative output path for this artifact.
    pub fn bundle_path(&self, app_name: &str) -> PathBuf {
        match self {
            ArtifactKind::Dockerfile => PathBuf::from("Dockerfile"),
            ArtifactKind::DeploymentManifest => {
                Path::new(MANIFEST_DIR).join(format!("{app_name}-deployment.yaml"))
            }
            ArtifactKind::ServiceManifest => {
                Path::new(MANIFEST_DIR).join(format!("{app_name}-service.yaml"))
            }
            ArtifactKind::AutoscalerManifest => {
                Path::new(MANIFEST_DIR).join(format!("{app_name}-hpa.yaml"))
            }
            ArtifactKind::SecretTemplate => {
                Path::new(MANIFEST_DIR).join(format!("{app_name}-secret.yaml"))
            }
            ArtifactKind::Jenkinsfile => PathBuf::from("Jenkinsfile"),
        }
    }
}

// ---------------------------------------------------------------------------
// TemplateEngine
// ---------------------------------------------------------------------------

/// Tera engine for the two text artifacts, with optional user overrides.
///
/// `user_template_dir` may contain `dockerfile.tera` / `jenkinsfile.tera`
/// files that replace the embedded defaults.
pub struct TemplateEngine {
    tera: Tera,
}

impl TemplateEngine {
    /// Construct a [`TemplateEngine`], loading embedded templates plus any
    /// overrides found in `user_template_dir`.
    pub fn new(user_template_dir: Option<&Path>) -> Result<Self, RenderError> {
        let tera = build_tera(user_template_dir)?;
        Ok(TemplateEngine { tera })
    }

    fn render_template(&self, name: &str, ctx: &RenderContext) -> Result<String, RenderError> {
        let tera_ctx = ctx.to_tera_context()?;
        Ok(self.tera.render(name, &tera_ctx)?)
    }
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// Renders the full artifact bundle for validated descriptors.
///
/// Holds the deploy policy; create once with [`Renderer::new`] and reuse
/// across requests.
pub struct Renderer {
    engine: TemplateEngine,
    policy: DeployPolicy,
}

impl Renderer {
    /// Construct a [`Renderer`] with embedded templates.
    pub fn new(policy: DeployPolicy) -> Result<Self, RenderError> {
        Self::with_template_dir(policy, None)
    }

    /// Construct a [`Renderer`] honoring template overrides in `dir`.
    pub fn with_template_dir(
        policy: DeployPolicy,
        dir: Option<&Path>,
    ) -> Result<Self, RenderError> {
        Ok(Renderer {
            engine: TemplateEngine::new(dir)?,
            policy,
        })
    }

    /// Render every artifact for `descriptor` into an ordered bundle.
    ///
    /// Fails atomically: the first renderer error discards all output for
    /// this request.
    pub fn render_bundle(
        &self,
        descriptor: &ValidatedDescriptor,
    ) -> Result<ArtifactBundle, RenderError> {
        let ctx = RenderContext::new(descriptor, &self.policy);
        let mut bundle = ArtifactBundle::new();
        for kind in ArtifactKind::all() {
            let content = self.render_artifact(&ctx, *kind)?;
            bundle.push(kind.bundle_path(&ctx.app_name), content)?;
        }
        Ok(bundle)
    }

    /// Render a single artifact from a prepared context.
    pub fn render_artifact(
        &self,
        ctx: &RenderContext,
        kind: ArtifactKind,
    ) -> Result<String, RenderError> {
        match kind {
            ArtifactKind::Dockerfile => self.engine.render_template("dockerfile.tera", ctx),
            ArtifactKind::Jenkinsfile => self.engine.render_template("jenkinsfile.tera", ctx),
            ArtifactKind::DeploymentManifest => {
                manifest::to_yaml(&DeploymentManifest::new(ctx, &self.policy))
            }
            ArtifactKind::ServiceManifest => manifest::to_yaml(&ServiceManifest::new(ctx)),
            ArtifactKind::AutoscalerManifest => {
                manifest::to_yaml(&HpaManifest::new(ctx, &self.policy))
            }
            ArtifactKind::SecretTemplate => manifest::to_yaml(&SecretManifest::new(ctx)),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
