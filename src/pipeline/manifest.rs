//! The global manifest: every module of the tree keyed by derived name

use super::files::{read_json, write_json, EXCLUDED_DIRS, META_MANIFEST, MODULE_RECORD};
use crate::error::PipelineError;
use crate::fs::{find_files_excluding, FileSystem};
use crate::model::{ManifestEntry, ModuleRecord};
use anyhow::Result;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalManifest {
    entries: BTreeMap<String, ManifestEntry>,
}

impl GlobalManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `entry` unless its name is already taken. Returns whether it
    /// was inserted.
    pub fn insert(&mut self, entry: ManifestEntry) -> bool {
        if self.entries.contains_key(&entry.name) {
            return false;
        }
        self.entries.insert(entry.name.clone(), entry);
        true
    }

    pub fn get(&self, name: &str) -> Option<&ManifestEntry> {
        self.entries.get(name)
    }

    /// Label of a buildable module, `None` for unknown or source-less modules
    pub fn label_of(&self, name: &str) -> Option<&str> {
        self.get(name)
            .filter(|e| e.is_buildable())
            .map(|e| e.label.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by name
    pub fn entries(&self) -> impl Iterator<Item = &ManifestEntry> {
        self.entries.values()
    }

    /// Reads every per-module record under `root` in walk order, skipping
    /// build output directories. The first record for a name wins; later
    /// ones are reported and dropped.
    pub fn collect(fs: &dyn FileSystem, root: &Path) -> Result<Self> {
        let records =
            find_files_excluding(fs, root, EXCLUDED_DIRS, |e| e.name == MODULE_RECORD)?;
        let mut manifest = Self::new();
        let mut origins: BTreeMap<String, PathBuf> = BTreeMap::new();

        for path in records {
            let record: ModuleRecord = read_json(fs, &path)?;
            let entry = record.to_manifest_entry();
            debug!(module = %entry.name, record = %path.display(), "Read module record");

            if let Some(first) = origins.get(&entry.name) {
                warn!(
                    module = %entry.name,
                    kept = %first.display(),
                    dropped = %path.display(),
                    "Duplicate module name, keeping the first record"
                );
                continue;
            }
            origins.insert(entry.name.clone(), path);
            manifest.insert(entry);
        }

        Ok(manifest)
    }

    /// Loads `tmp-bzl-meta.json` from the tree root
    pub fn load(fs: &dyn FileSystem, root: &Path) -> Result<Self> {
        let path = root.join(META_MANIFEST);
        if !fs.is_file(&path) {
            return Err(PipelineError::MissingManifest(path).into());
        }

        let entries: Vec<ManifestEntry> = read_json(fs, &path)?;
        let mut manifest = Self::new();
        for entry in entries {
            manifest.insert(entry);
        }
        Ok(manifest)
    }

    pub fn save(&self, fs: &dyn FileSystem, path: &Path) -> Result<()> {
        let entries: Vec<&ManifestEntry> = self.entries().collect();
        write_json(fs, path, &entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::is_fatal;
    use crate::fs::MockFileSystem;
    use crate::model::ModuleIdentity;

    fn record_json(rel_dir: &str, artifact: &str, sources: &[&str]) -> String {
        let record = ModuleRecord {
            root_dir: "/mock".to_string(),
            rel_dir: rel_dir.to_string(),
            identity: ModuleIdentity::new("com.acme", artifact, "1.0", "jar"),
            sources: sources.iter().map(|s| s.to_string()).collect(),
        };
        serde_json::to_string(&record).unwrap()
    }

    #[test]
    fn test_collect_sorted_by_name() {
        let fs = MockFileSystem::new();
        fs.add_file("zeta/tmp-bzl-module.json", &record_json("zeta", "zeta", &["src/*.java"]));
        fs.add_file("alpha/tmp-bzl-module.json", &record_json("alpha", "alpha", &[]));
        fs.add_file("tmp-bzl-module.json", &record_json("", "parent", &[]));

        let manifest = GlobalManifest::collect(&fs, Path::new("/mock")).unwrap();
        let names: Vec<&str> = manifest.entries().map(|e| e.name.as_str()).collect();

        assert_eq!(
            names,
            vec!["com_acme_alpha_1_0", "com_acme_parent_1_0", "com_acme_zeta_1_0"]
        );
        assert_eq!(manifest.label_of("com_acme_zeta_1_0"), Some("//zeta:com_acme_zeta_1_0"));
        assert_eq!(manifest.label_of("com_acme_alpha_1_0"), None);
    }

    #[test]
    fn test_duplicate_name_first_record_wins() {
        let fs = MockFileSystem::new();
        fs.add_file("a/tmp-bzl-module.json", &record_json("a", "same", &["src/*.java"]));
        fs.add_file("b/tmp-bzl-module.json", &record_json("b", "same", &["src/*.java"]));

        let manifest = GlobalManifest::collect(&fs, Path::new("/mock")).unwrap();

        assert_eq!(manifest.len(), 1);
        assert_eq!(manifest.label_of("com_acme_same_1_0"), Some("//a:com_acme_same_1_0"));
    }

    #[test]
    fn test_collect_skips_records_under_build_output() {
        let fs = MockFileSystem::new();
        fs.add_file("app/tmp-bzl-module.json", &record_json("app", "app", &[]));
        fs.add_file(
            "app/target/classes/tmp-bzl-module.json",
            &record_json("app/target/classes", "stale", &[]),
        );
        fs.add_file("node_modules/x/tmp-bzl-module.json", "{\"rootDir\": ");

        let manifest = GlobalManifest::collect(&fs, Path::new("/mock")).unwrap();

        assert_eq!(manifest.len(), 1);
        assert!(manifest.get("com_acme_stale_1_0").is_none());
    }

    #[test]
    fn test_malformed_record_is_fatal() {
        let fs = MockFileSystem::new();
        fs.add_file("a/tmp-bzl-module.json", "{\"rootDir\": ");

        let err = GlobalManifest::collect(&fs, Path::new("/mock")).unwrap_err();
        assert!(is_fatal(&err));
    }

    #[test]
    fn test_load_missing_manifest_is_fatal() {
        let fs = MockFileSystem::new();

        let err = GlobalManifest::load(&fs, Path::new("/mock")).unwrap_err();
        assert!(is_fatal(&err));
        assert!(err.to_string().contains("run the meta pass first"));
    }

    #[test]
    fn test_save_then_load() {
        let fs = MockFileSystem::new();
        fs.add_file("lib/tmp-bzl-module.json", &record_json("lib", "lib", &["src/*.java"]));
        let manifest = GlobalManifest::collect(&fs, Path::new("/mock")).unwrap();

        manifest.save(&fs, Path::new("/mock/tmp-bzl-meta.json")).unwrap();
        let loaded = GlobalManifest::load(&fs, Path::new("/mock")).unwrap();

        assert_eq!(loaded, manifest);
        assert!(fs
            .content("tmp-bzl-meta.json")
            .unwrap()
            .contains("\"artifactFilename\": \"lib-1.0.jar\""));
    }
}
