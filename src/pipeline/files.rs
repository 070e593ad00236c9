//! Names of the files the passes exchange, and JSON helpers for them

use crate::error::PipelineError;
use crate::fs::FileSystem;
use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Component, Path};

/// Prefix shared by every intermediate file
pub const INTERMEDIATE_PREFIX: &str = "tmp-bzl-";

pub const MODULE_RECORD: &str = "tmp-bzl-module.json";
pub const META_MANIFEST: &str = "tmp-bzl-meta.json";
pub const DEPENDENCY_SHARD: &str = "tmp-bzl-dependency.json";
pub const SERVER_SHARD: &str = "tmp-bzl-server.json";

pub const BUILD: &str = "BUILD";
pub const WORKSPACE: &str = "WORKSPACE";

pub const BUILD_PREPEND: &str = "bzl-build-prepend.txt";
pub const BUILD_APPEND: &str = "bzl-build-append.txt";
pub const WORKSPACE_PREPEND: &str = "bzl-workspace-prepend.txt";
pub const WORKSPACE_APPEND: &str = "bzl-workspace-append.txt";

/// Directories never searched for modules or intermediate files
pub const EXCLUDED_DIRS: &[&str] = &["target", ".git", "node_modules"];

/// Writes `value` as pretty JSON followed by a newline
pub fn write_json<T: Serialize + ?Sized>(fs: &dyn FileSystem, path: &Path, value: &T) -> Result<()> {
    let mut json = serde_json::to_string_pretty(value)
        .with_context(|| format!("Failed to serialize {}", path.display()))?;
    json.push('\n');
    fs.write(path, &json)
}

/// Reads a file written by an earlier pass. Unparseable content is
/// reported as [`PipelineError::MalformedState`].
pub fn read_json<T: DeserializeOwned>(fs: &dyn FileSystem, path: &Path) -> Result<T> {
    let content = fs.read_to_string(path)?;
    serde_json::from_str(&content).map_err(|source| {
        PipelineError::MalformedState {
            path: path.to_path_buf(),
            source,
        }
        .into()
    })
}

/// `dir` relative to `root`, `/`-separated; empty when they are equal
pub fn relative_dir(root: &Path, dir: &Path) -> Result<String> {
    let rel = dir
        .strip_prefix(root)
        .map_err(|_| anyhow!("{} is not inside {}", dir.display(), root.display()))?;

    let parts: Vec<String> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    Ok(parts.join("/"))
}

/// Removes `path` when it exists
pub fn remove_if_exists(fs: &dyn FileSystem, path: &Path) -> Result<bool> {
    if fs.is_file(path) {
        fs.remove_file(path)?;
        Ok(true)
    } else {
        Ok(false)
    }
}
