//! `gantry check` — validate a descriptor without rendering.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use super::load_descriptor;

/// Arguments for `gantry check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to the application descriptor (YAML).
    pub descriptor: PathBuf,
}

impl CheckArgs {
    pub fn run(self) -> Result<()> {
        let raw = load_descriptor(&self.descriptor)?;
        let valid = raw
            .validate()
            .map_err(anyhow::Error::new)
            .with_context(|| format!("descriptor '{}' is invalid", self.descriptor.display()))?;

        let d = valid.descriptor();
        println!(
            "{} '{}' is valid ({} environment variables, ports {}/{})",
            "✓".green(),
            d.name,
            d.env.len(),
            d.service_port,
            d.node_port
        );
        Ok(())
    }
}
