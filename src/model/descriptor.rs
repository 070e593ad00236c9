//! Per-module records produced by the module pass and the global manifest
//! entries derived from them

use super::identity::ModuleIdentity;
use serde::{Deserialize, Serialize};

/// Extension of the source files a module compiles
pub const SOURCE_EXT: &str = "java";

/// Persisted form of one module, written to `tmp-bzl-module.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleRecord {
    /// Shared build-tree root, absolute
    pub root_dir: String,
    /// Module root relative to `root_dir`, `/`-separated, empty for the root module
    pub rel_dir: String,
    #[serde(flatten)]
    pub identity: ModuleIdentity,
    /// `<dir>/*.java` globs relative to the module root, sorted
    pub sources: Vec<String>,
}

impl ModuleRecord {
    pub fn derived_name(&self) -> String {
        self.identity.derived_name()
    }

    pub fn has_sources(&self) -> bool {
        !self.sources.is_empty()
    }

    /// `//<relDir>:<name>`, or empty when the module has no sources
    pub fn derived_label(&self) -> String {
        if self.has_sources() {
            format!("//{}:{}", self.rel_dir, self.derived_name())
        } else {
            String::new()
        }
    }

    /// `<artifactId>-<version>.jar`, or empty when the module has no sources
    pub fn artifact_filename(&self) -> String {
        if self.has_sources() {
            format!("{}-{}.jar", self.identity.artifact_id, self.identity.version)
        } else {
            String::new()
        }
    }

    pub fn to_manifest_entry(&self) -> ManifestEntry {
        ManifestEntry {
            name: self.derived_name(),
            label: self.derived_label(),
            sources: self.sources.clone(),
            dir: self.rel_dir.clone(),
            artifact_filename: self.artifact_filename(),
        }
    }
}

/// One element of the global manifest `tmp-bzl-meta.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    pub name: String,
    pub label: String,
    pub sources: Vec<String>,
    pub dir: String,
    pub artifact_filename: String,
}

impl ManifestEntry {
    pub fn is_buildable(&self) -> bool {
        !self.label.is_empty()
    }
}

/// Glob for one source directory, relative to the module root
pub fn source_glob(dir: &str) -> String {
    if dir.is_empty() {
        format!("*.{SOURCE_EXT}")
    } else {
        format!("{dir}/*.{SOURCE_EXT}")
    }
}

/// Renders a `glob([...])` expression, one pattern per line
///
/// ```
/// use bazelize::model::glob_expression;
///
/// assert_eq!(glob_expression(&["a/*.java".to_string()]), r#"glob(["a/*.java"])"#);
/// ```
pub fn glob_expression(sources: &[String]) -> String {
    let separator = format!("\",\n{} \"", " ".repeat(16));
    format!("glob([\"{}\"])", sources.join(&separator))
}
