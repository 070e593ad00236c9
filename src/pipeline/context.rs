//! Pipeline context owning everything a pass needs for one invocation

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::Result;

use crate::config::BazelizeConfig;
use crate::fs::FileSystem;
use crate::maven::{DependencySource, LocalRepository, PomDependencySource};
use crate::render::TemplateSet;

use super::backup::Backup;
use super::files::relative_dir;
use super::manifest::GlobalManifest;

/// Built once per top-level invocation and handed to every pass
pub struct PipelineContext {
    /// File system abstraction
    pub file_system: Arc<dyn FileSystem>,

    /// Where each module's dependency set comes from
    pub dependency_source: Arc<dyn DependencySource>,

    pub config: BazelizeConfig,

    /// Shared build-tree root
    pub root: PathBuf,

    pub templates: TemplateSet,

    backup: Backup,

    /// Parsed `tmp-bzl-meta.json`, read at most once
    manifest: Mutex<Option<Arc<GlobalManifest>>>,
}

impl PipelineContext {
    pub fn new(
        file_system: Arc<dyn FileSystem>,
        config: BazelizeConfig,
        root: PathBuf,
        backup_suffix: Option<String>,
    ) -> Result<Self> {
        let templates = TemplateSet::load(file_system.as_ref(), config.template_dir.as_deref())?;
        Ok(Self {
            file_system,
            dependency_source: Arc::new(PomDependencySource),
            config,
            root,
            templates,
            backup: Backup::new(backup_suffix),
            manifest: Mutex::new(None),
        })
    }

    pub fn with_dependency_source(mut self, source: Arc<dyn DependencySource>) -> Self {
        self.dependency_source = source;
        self
    }

    pub fn fs(&self) -> &dyn FileSystem {
        self.file_system.as_ref()
    }

    pub fn backup(&self) -> &Backup {
        &self.backup
    }

    pub fn backup_suffix(&self) -> Option<&str> {
        self.backup.suffix()
    }

    pub fn local_repository(&self) -> LocalRepository {
        LocalRepository::new(&self.config.local_repository)
    }

    /// Module directory relative to the tree root, `/`-separated
    pub fn rel_dir(&self, module_dir: &Path) -> Result<String> {
        relative_dir(&self.root, module_dir)
    }

    /// The global manifest, loaded from the tree root on first use
    pub fn manifest(&self) -> Result<Arc<GlobalManifest>> {
        let mut cached = self.manifest.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(manifest) = cached.as_ref() {
            return Ok(manifest.clone());
        }

        let manifest = Arc::new(GlobalManifest::load(self.fs(), &self.root)?);
        *cached = Some(manifest.clone());
        Ok(manifest)
    }

    /// Replaces the cached manifest with one just written
    pub fn set_manifest(&self, manifest: GlobalManifest) -> Arc<GlobalManifest> {
        let manifest = Arc::new(manifest);
        let mut cached = self.manifest.lock().unwrap_or_else(|e| e.into_inner());
        *cached = Some(manifest.clone());
        manifest
    }
}
