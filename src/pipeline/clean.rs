//! Removal of intermediate files and backups left by earlier runs

use super::files::{BUILD, INTERMEDIATE_PREFIX, WORKSPACE};
use crate::fs::{find_files, FileSystem};
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Whether `name` is a file `clean` removes
pub fn is_cleanable(name: &str, expunge: bool) -> bool {
    let intermediate = name.starts_with(INTERMEDIATE_PREFIX)
        && (name.ends_with(".json") || name.contains(".json_"));
    let backup = [BUILD, WORKSPACE]
        .iter()
        .any(|stable| name.len() > stable.len() + 1 && name.starts_with(&format!("{stable}_")));
    let generated = expunge && (name == BUILD || name == WORKSPACE);

    intermediate || backup || generated
}

/// Deletes intermediate files and backups everywhere below `root`; with
/// `expunge` the generated BUILD and WORKSPACE files too. Returns the
/// removed paths.
pub fn clean(fs: &dyn FileSystem, root: &Path, expunge: bool) -> Result<Vec<PathBuf>> {
    let targets = find_files(fs, root, |e| is_cleanable(&e.name, expunge))?;

    for path in &targets {
        fs.remove_file(path)?;
        debug!(path = %path.display(), "Removed");
    }

    info!(root = %root.display(), removed = targets.len(), expunge, "Clean complete");
    Ok(targets)
}
