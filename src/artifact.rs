//! Locating the downloader's output inside a request's working directory.
//!
//! The runner always passes `-o downloaded.%(ext)s`, so whatever the tool
//! produced is named `downloaded.<something>`. The extension is the tool's
//! choice (merges and recodes can change it), which is why this scans
//! instead of guessing a path up front.

use std::path::{Path, PathBuf};

use crate::error::{DownloadError, Result};

/// File stem the output template pins the artifact to.
pub const ARTIFACT_STEM: &str = "downloaded";

#[derive(Debug)]
pub struct Artifact {
    pub path: PathBuf,
    /// Byte length at locate time, reported as Content-Length.
    pub len: u64,
}

/// Finds the artifact in `dir`. If the tool somehow left several
/// `downloaded.*` files, the first by sorted file name wins.
pub fn locate(dir: &Path) -> Result<Artifact> {
    let prefix = format!("{ARTIFACT_STEM}.");
    let mut candidates: Vec<PathBuf> = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let matches = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with(&prefix));
        if matches && path.is_file() {
            candidates.push(path);
        }
    }
    candidates.sort();

    let path = candidates
        .into_iter()
        .next()
        .ok_or(DownloadError::NoArtifact)?;
    let len = std::fs::metadata(&path)?.len();
    Ok(Artifact { path, len })
}
