//! CLI subcommands.

pub mod check;
pub mod diff;
pub mod generate;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use gantry_core::{ApplicationDescriptor, DeployPolicy, ValidatedDescriptor};

/// Read and deserialize a descriptor document.
pub(crate) fn load_descriptor(path: &Path) -> Result<ApplicationDescriptor> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read descriptor '{}'", path.display()))?;
    serde_yaml::from_str(&contents)
        .with_context(|| format!("malformed descriptor '{}'", path.display()))
}

/// Load the deploy policy: built-in defaults, or the given YAML file.
pub(crate) fn load_policy(path: Option<&Path>) -> Result<DeployPolicy> {
    match path {
        None => Ok(DeployPolicy::default()),
        Some(p) => {
            let contents = std::fs::read_to_string(p)
                .with_context(|| format!("cannot read policy '{}'", p.display()))?;
            DeployPolicy::from_yaml_str(&contents)
                .with_context(|| format!("malformed policy '{}'", p.display()))
        }
    }
}

/// Default destination for a descriptor: `generated/<name>`.
pub(crate) fn default_out_dir(descriptor: &ValidatedDescriptor) -> PathBuf {
    PathBuf::from("generated").join(descriptor.descriptor().name.to_string())
}
