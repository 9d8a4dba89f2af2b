//! `gantry diff` — unified diff of what generate would write.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use gantry_emit::{diff_bundle, DiffStatus};
use gantry_renderer::Renderer;

use super::{default_out_dir, load_descriptor, load_policy};

/// Arguments for `gantry diff`.
#[derive(Args, Debug)]
pub struct DiffArgs {
    /// Path to the application descriptor (YAML).
    pub descriptor: PathBuf,

    /// Destination directory to compare against (default: generated/<name>).
    #[arg(long, short = 'o')]
    pub out: Option<PathBuf>,

    /// Deploy policy overrides (YAML).
    #[arg(long)]
    pub policy: Option<PathBuf>,
}

impl DiffArgs {
    pub fn run(self) -> Result<()> {
        let descriptor = load_descriptor(&self.descriptor)?
            .validate()
            .context("descriptor failed validation")?;
        let policy = load_policy(self.policy.as_deref())?;

        let app = descriptor.descriptor().name.to_string();
        let out = self
            .out
            .clone()
            .unwrap_or_else(|| default_out_dir(&descriptor));

        let renderer = Renderer::new(policy).context("renderer construction failed")?;
        let bundle = renderer
            .render_bundle(&descriptor)
            .with_context(|| format!("artifact rendering failed for '{app}'"))?;
        let diff = diff_bundle(&bundle, &out)
            .with_context(|| format!("cannot diff against '{}'", out.display()))?;

        if diff.is_clean() {
            println!("{} '{app}' — destination already current", "✓".green());
            return Ok(());
        }

        for file_diff in &diff.diffs {
            let label = match file_diff.status {
                DiffStatus::Added => "added".green(),
                DiffStatus::Changed => "changed".yellow(),
                DiffStatus::Removed => "removed".red(),
            };
            println!("{} {}", label, file_diff.path.display());
            print!("{}", file_diff.unified_diff);
        }
        Ok(())
    }
}
