//! `gantry generate` — render and write the artifact bundle.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use gantry_emit::{write_bundle, EmitOutcome};
use gantry_renderer::Renderer;

use super::{default_out_dir, load_descriptor, load_policy};

/// Arguments for `gantry generate`.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Path to the application descriptor (YAML).
    pub descriptor: PathBuf,

    /// Destination directory (default: generated/<name>). Replaced wholesale
    /// on every write.
    #[arg(long, short = 'o')]
    pub out: Option<PathBuf>,

    /// Deploy policy overrides (YAML).
    #[arg(long)]
    pub policy: Option<PathBuf>,

    /// Render and report without writing any files.
    #[arg(long)]
    pub dry_run: bool,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Tabled)]
struct FileRow {
    #[tabled(rename = "file")]
    file: String,
    #[tabled(rename = "bytes")]
    bytes: usize,
}

#[derive(Serialize)]
struct GenerateJson {
    app: String,
    dest: String,
    outcome: &'static str,
    files: Vec<String>,
}

impl GenerateArgs {
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
        let report = write_bundle(&bundle, &out, self.dry_run)
            .with_context(|| format!("cannot write bundle to '{}'", out.display()))?;

        if self.json {
            let payload = GenerateJson {
                app,
                dest: out.display().to_string(),
                outcome: outcome_key(report.outcome),
                files: bundle.paths().map(|p| p.display().to_string()).collect(),
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&payload).context("failed to serialize JSON")?
            );
            return Ok(());
        }

        let prefix = if self.dry_run { "[dry-run] " } else { "" };
        match report.outcome {
            EmitOutcome::Unchanged => {
                println!(
                    "{prefix}{} '{app}' — destination already current",
                    "✓".green()
                );
            }
            EmitOutcome::WouldWrite => {
                println!(
                    "{prefix}{} '{app}' → {} ({} files)",
                    "~".yellow(),
                    out.display(),
                    bundle.len()
                );
            }
            EmitOutcome::Written => {
                println!(
                    "{prefix}{} '{app}' → {} ({} files)",
                    "✓".green(),
                    out.display(),
                    bundle.len()
                );
            }
        }

        let rows: Vec<FileRow> = bundle
            .iter()
            .map(|artifact| FileRow {
                file: artifact.path.display().to_string(),
                bytes: artifact.content.len(),
            })
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
        Ok(())
    }
}

fn outcome_key(outcome: EmitOutcome) -> &'static str {
    match outcome {
        EmitOutcome::Written => "written",
        EmitOutcome::Unchanged => "unchanged",
        EmitOutcome::WouldWrite => "would_write",
    }
}
