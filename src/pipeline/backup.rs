//! Backup of stable outputs before they are regenerated
//!
//! One suffix is chosen per invocation and shared by every pass. Each file
//! is backed up at most once per invocation, so a file rewritten by several
//! passes keeps the content it had before the run started.

use crate::fs::FileSystem;
use anyhow::Result;
use chrono::NaiveDateTime;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// An explicit suffix always wins and implies a backup; otherwise a
/// timestamp is used when `backup` is requested.
pub fn resolve_suffix(backup: bool, suffix: Option<&str>, now: NaiveDateTime) -> Option<String> {
    match suffix.map(str::trim).filter(|s| !s.is_empty()) {
        Some(explicit) => Some(explicit.to_string()),
        None if backup => Some(now.format(TIMESTAMP_FORMAT).to_string()),
        None => None,
    }
}

/// `<path>_<suffix>`
pub fn backup_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push("_");
    name.push(suffix);
    PathBuf::from(name)
}

#[derive(Debug, Default)]
pub struct Backup {
    suffix: Option<String>,
    done: Mutex<BTreeSet<PathBuf>>,
}

impl Backup {
    pub fn new(suffix: Option<String>) -> Self {
        Self {
            suffix,
            done: Mutex::new(BTreeSet::new()),
        }
    }

    pub fn suffix(&self) -> Option<&str> {
        self.suffix.as_deref()
    }

    pub fn is_enabled(&self) -> bool {
        self.suffix.is_some()
    }

    /// Moves `path` aside. Returns the backup path when a backup was made.
    pub fn rename_if_exists(&self, fs: &dyn FileSystem, path: &Path) -> Result<Option<PathBuf>> {
        let Some(target) = self.claim(fs, path) else {
            return Ok(None);
        };
        fs.rename(path, &target)?;
        info!(from = %path.display(), to = %target.display(), "Moved previous file aside");
        Ok(Some(target))
    }

    /// Copies `path` aside, leaving the original in place
    pub fn copy_if_exists(&self, fs: &dyn FileSystem, path: &Path) -> Result<Option<PathBuf>> {
        let Some(target) = self.claim(fs, path) else {
            return Ok(None);
        };
        fs.copy(path, &target)?;
        info!(from = %path.display(), to = %target.display(), "Backed up previous file");
        Ok(Some(target))
    }

    fn claim(&self, fs: &dyn FileSystem, path: &Path) -> Option<PathBuf> {
        let suffix = self.suffix.as_deref()?;
        if !fs.is_file(path) {
            return None;
        }

        let mut done = self.done.lock().unwrap_or_else(|e| e.into_inner());
        if !done.insert(path.to_path_buf()) {
            debug!(path = %path.display(), "Already backed up in this run");
            return None;
        }
        Some(backup_path(path, suffix))
    }
}
