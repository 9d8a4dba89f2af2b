//! # gantry-renderer
//!
//! Renders the deployment artifact bundle for a validated application
//! descriptor: container build file, orchestration manifests, secret
//! template, and delivery pipeline definition.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use gantry_core::{ApplicationDescriptor, DeployPolicy};
//! use gantry_renderer::Renderer;
//!
//! fn render(descriptor: ApplicationDescriptor) {
//!     let valid = descriptor.validate().expect("descriptor");
//!     if let Ok(renderer) = Renderer::new(DeployPolicy::default()) {
//!         if let Ok(bundle) = renderer.render_bundle(&valid) {
//!             for artifact in bundle.iter() {
//!                 println!("{}: {} bytes", artifact.path.display(), artifact.content.len());
//!             }
//!         }
//!     }
//! }
//! ```

pub mod bundle;
pub mod context;
pub mod engine;
pub mod error;
pub mod manifest;

pub use bundle::{Artifact, ArtifactBundle};
pub use context::{EnvVarCtx, RenderContext};
pub use engine::{ArtifactKind, Renderer, TemplateEngine, MANIFEST_DIR};
pub use error::RenderError;
