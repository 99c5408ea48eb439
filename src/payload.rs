//! Payload location inside an extracted archive.
//!
//! Upstream archives have exactly two observed shapes: the marker directory
//! sits either directly at the archive root or one level inside a single
//! version-named wrapping folder. The candidate list makes that policy
//! explicit; no deeper recursive search is performed.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, SyncError};

/// Fixed relative path of the payload inside an extracted archive.
pub const PAYLOAD_PATH: &[&str] = &["IBJts", "source", "pythonclient"];

/// Find the payload directory under an extraction root.
///
/// Tries the fixed path directly under `extracted_root`, then the same path
/// one level inside each top-level directory. First match wins. Fails with
/// [`SyncError::Layout`] listing what was actually found.
pub fn locate(extracted_root: &Path) -> Result<PathBuf> {
    for candidate in candidates(extracted_root)? {
        if candidate.is_dir() {
            tracing::debug!("Found payload at {}", candidate.display());
            return Ok(candidate);
        }
    }

    Err(SyncError::Layout {
        found: top_level_entries(extracted_root),
    })
}

/// Ordered candidate payload paths for the two known archive shapes.
fn candidates(root: &Path) -> Result<Vec<PathBuf>> {
    let mut candidates = vec![join_payload(root)];
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            candidates.push(join_payload(&entry.path()));
        }
    }
    Ok(candidates)
}

fn join_payload(base: &Path) -> PathBuf {
    PAYLOAD_PATH.iter().fold(base.to_path_buf(), |p, seg| p.join(seg))
}

/// Names of the root's entries, sorted, for the layout diagnostic.
fn top_level_entries(root: &Path) -> Vec<String> {
    let mut entries: Vec<String> = fs::read_dir(root)
        .map(|iter| {
            iter.filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    entries.sort();
    entries
}
