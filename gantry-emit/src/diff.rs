//! Unified diff of a rendered bundle against a destination directory.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use similar::TextDiff;

use gantry_renderer::ArtifactBundle;

use crate::error::{io_err, EmitError};
use crate::writer::{collect_files, normalize_line_endings};

/// How one path differs between bundle and destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffStatus {
    /// In the bundle, absent from the destination.
    Added,
    /// Present on both sides with different content.
    Changed,
    /// On disk, absent from the bundle; a write would drop it.
    Removed,
}

/// A single per-file diff. `path` is bundle-relative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub path: PathBuf,
    pub status: DiffStatus,
    pub unified_diff: String,
}

/// Diff result for one destination.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleDiff {
    pub diffs: Vec<FileDiff>,
}

impl BundleDiff {
    /// True when a write would be a no-op.
    pub fn is_clean(&self) -> bool {
        self.diffs.is_empty()
    }
}

/// Compare `bundle` against the current contents of `dest`.
///
/// No files are written.
pub fn diff_bundle(bundle: &ArtifactBundle, dest: &Path) -> Result<BundleDiff, EmitError> {
    let mut diffs = Vec::new();

    for artifact in bundle.iter() {
        let rendered = normalize_line_endings(&artifact.content);
        let full = dest.join(&artifact.path);
        match read_existing(&full)? {
            Some(current) if current == rendered => continue,
            Some(current) => diffs.push(FileDiff {
                path: artifact.path.clone(),
                status: DiffStatus::Changed,
                unified_diff: unified(&artifact.path, &current, &rendered),
            }),
            None => diffs.push(FileDiff {
                path: artifact.path.clone(),
                status: DiffStatus::Added,
                unified_diff: unified(&artifact.path, "", &rendered),
            }),
        }
    }

    if dest.exists() {
        let mut on_disk = Vec::new();
        collect_files(dest, dest, &mut on_disk)?;
        for rel in on_disk {
            if bundle.contains(&rel) {
                continue;
            }
            let full = dest.join(&rel);
            let current = read_existing(&full)?.unwrap_or_default();
            diffs.push(FileDiff {
                path: rel.clone(),
                status: DiffStatus::Removed,
                unified_diff: unified(&rel, &current, ""),
            });
        }
    }

    Ok(BundleDiff { diffs })
}

fn unified(path: &Path, old: &str, new: &str) -> String {
    let old_header = format!("a/{}", path.display());
    let new_header = format!("b/{}", path.display());
    TextDiff::from_lines(old, new)
        .unified_diff()
        .header(&old_header, &new_header)
        .context_radius(3)
        .to_string()
}

fn read_existing(path: &Path) -> Result<Option<String>, EmitError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(normalize_line_endings(&content))),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(io_err(path, err)),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
