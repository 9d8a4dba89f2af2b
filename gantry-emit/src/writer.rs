//! Full-replace bundle writer.
//!
//! ## Write protocol
//!
//! 1. Digest the rendered bundle and the destination's current contents.
//! 2. Identical → report `Unchanged`, touch nothing.
//! 3. Stage every file into `<dest>.gantry.tmp`.
//! 4. Remove the old destination, rename the staging directory into place.
//!
//! A failure at any step removes the staging directory and leaves the
//! destination exactly as it was; a partial bundle never reaches it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use gantry_renderer::ArtifactBundle;

use crate::error::{io_err, EmitError};

// ---------------------------------------------------------------------------
// Write result
// ---------------------------------------------------------------------------

/// Outcome of writing one bundle to a destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitOutcome {
    /// The destination was (re)created with the bundle's contents.
    Written,
    /// The destination already held exactly this bundle; nothing was touched.
    Unchanged,
    /// Dry-run mode: the bundle *would* have been written.
    WouldWrite,
}

/// Summary of a [`write_bundle`] call.
#[derive(Debug, Clone)]
pub struct EmitReport {
    pub dest: PathBuf,
    pub outcome: EmitOutcome,
    /// Destination paths of every bundle file, in bundle order.
    pub files: Vec<PathBuf>,
}

// ---------------------------------------------------------------------------
// write_bundle
// ---------------------------------------------------------------------------

/// Write `bundle` to `dest`, replacing whatever the destination held.
///
/// Generation has no merge semantics: stale files from a previous bundle are
/// dropped along with the rest of the old destination.
pub fn write_bundle(
    bundle: &ArtifactBundle,
    dest: &Path,
    dry_run: bool,
) -> Result<EmitReport, EmitError> {
    let files: Vec<PathBuf> = bundle.iter().map(|a| dest.join(&a.path)).collect();

    if dest.exists() && destination_matches(bundle, dest)? {
        tracing::debug!("unchanged: {}", dest.display());
        return Ok(EmitReport {
            dest: dest.to_path_buf(),
            outcome: EmitOutcome::Unchanged,
            files,
        });
    }

    if dry_run {
        tracing::info!("[dry-run] would write: {}", dest.display());
        return Ok(EmitReport {
            dest: dest.to_path_buf(),
            outcome: EmitOutcome::WouldWrite,
            files,
        });
    }

    let staging = staging_dir(dest);
    if staging.exists() {
        std::fs::remove_dir_all(&staging).map_err(|e| io_err(&staging, e))?;
    }
    if let Err(err) = stage_bundle(bundle, &staging) {
        let _ = std::fs::remove_dir_all(&staging);
        return Err(err);
    }

    if let Some(parent) = dest.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
        }
    }
    if dest.exists() {
        if let Err(e) = std::fs::remove_dir_all(dest) {
            let _ = std::fs::remove_dir_all(&staging);
            return Err(io_err(dest, e));
        }
    }
    if let Err(e) = std::fs::rename(&staging, dest) {
        let _ = std::fs::remove_dir_all(&staging);
        return Err(io_err(dest, e));
    }

    tracing::info!("wrote bundle: {} ({} files)", dest.display(), bundle.len());
    Ok(EmitReport {
        dest: dest.to_path_buf(),
        outcome: EmitOutcome::Written,
        files,
    })
}

fn staging_dir(dest: &Path) -> PathBuf {
    PathBuf::from(format!("{}.gantry.tmp", dest.display()))
}

fn stage_bundle(bundle: &ArtifactBundle, staging: &Path) -> Result<(), EmitError> {
    for artifact in bundle.iter() {
        let path = staging.join(&artifact.path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
        }
        std::fs::write(&path, normalize_line_endings(&artifact.content))
            .map_err(|e| io_err(&path, e))?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Digests
// ---------------------------------------------------------------------------

/// SHA-256 over LF-normalized content.
pub(crate) fn content_digest(content: &str) -> String {
    bytes_digest(normalize_line_endings(content).as_bytes())
}

fn bytes_digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

pub(crate) fn normalize_line_endings(content: &str) -> String {
    content.replace("\r\n", "\n")
}

/// True when `dest` holds exactly the bundle's file set with matching
/// content digests.
fn destination_matches(bundle: &ArtifactBundle, dest: &Path) -> Result<bool, EmitError> {
    let mut expected: BTreeMap<PathBuf, String> = bundle
        .iter()
        .map(|a| (a.path.clone(), content_digest(&a.content)))
        .collect();

    let mut on_disk = Vec::new();
    collect_files(dest, dest, &mut on_disk)?;
    if on_disk.len() != expected.len() {
        return Ok(false);
    }
    for rel in on_disk {
        let Some(want) = expected.remove(&rel) else {
            return Ok(false);
        };
        let full = dest.join(&rel);
        let bytes = std::fs::read(&full).map_err(|e| io_err(&full, e))?;
        if bytes_digest(&bytes) != want {
            return Ok(false);
        }
    }
    Ok(expected.is_empty())
}

/// Collect all file paths under `dir`, relative to `root`.
pub(crate) fn collect_files(
    root: &Path,
    dir: &Path,
    out: &mut Vec<PathBuf>,
) -> Result<(), EmitError> {
    let entries = std::fs::read_dir(dir).map_err(|e| io_err(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        let path = entry.path();
        let meta = entry.metadata().map_err(|e| io_err(&path, e))?;
        if meta.is_dir() {
            collect_files(root, &path, out)?;
        } else if meta.is_file() {
            out.push(path.strip_prefix(root).unwrap_or(&path).to_path_buf());
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
