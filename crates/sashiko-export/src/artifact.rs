//! Artifact files
//!
//! Every artifact gets an opaque `sashiko-<uuid>.<ext>` name, is written to a
//! temp file in the target directory and only then persisted under its final
//! name, so a failed write never leaves a partial file behind. An
//! [`ArtifactGuard`] additionally removes already-persisted files of a
//! request unless the request commits.

use std::io::Write;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::error::Result;

/// A persisted artifact owned by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactFile {
    pub path: PathBuf,
    pub mime_type: &'static str,
    pub size: u64,
}

/// Unique file name for an artifact
pub fn artifact_name(extension: &str) -> String {
    format!("sashiko-{}.{}", Uuid::new_v4(), extension)
}

/// Write `bytes` into `dir` under a fresh unique name
pub fn write_artifact(
    dir: &Path,
    extension: &str,
    mime_type: &'static str,
    bytes: &[u8],
) -> Result<ArtifactFile> {
    let mut temp = tempfile::Builder::new()
        .prefix(".sashiko-")
        .suffix(".partial")
        .tempfile_in(dir)?;
    temp.write_all(bytes)?;
    temp.as_file().sync_all()?;

    let path = dir.join(artifact_name(extension));
    temp.persist_noclobber(&path).map_err(|e| e.error)?;
    log::debug!("Wrote {} ({} bytes)", path.display(), bytes.len());

    Ok(ArtifactFile {
        path,
        mime_type,
        size: bytes.len() as u64,
    })
}

/// Removes tracked files on drop unless [`commit`](ArtifactGuard::commit)ted
#[derive(Debug, Default)]
pub struct ArtifactGuard {
    paths: Vec<PathBuf>,
    committed: bool,
}

impl ArtifactGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a file that must not outlive a failed request
    pub fn track(&mut self, file: &ArtifactFile) {
        self.paths.push(file.path.clone());
    }

    /// Keep every tracked file
    pub fn commit(mut self) {
        self.committed = true;
    }

    pub fn tracked(&self) -> &[PathBuf] {
        &self.paths
    }
}

impl Drop for ArtifactGuard {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        for path in &self.paths {
            match std::fs::remove_file(path) {
                Ok(()) => log::debug!("Removed orphaned artifact {}", path.display()),
                Err(e) => log::warn!("Failed to remove {}: {}", path.display(), e),
            }
        }
    }
}
