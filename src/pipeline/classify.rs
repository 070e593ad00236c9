//! Source-directory classification for one module subtree
//!
//! A single depth-first walk decides which directories hold source files.
//! Blacklisted directories are pruned with their whole subtree. Meeting a
//! second module descriptor means the walk has reached a nested module: the
//! walk stops and everything collected so far is discarded, since nested
//! modules own their sources.

use crate::fs::{walk, DirEntry, FileSystem, Visit, Visitor, WalkOutcome};
use crate::maven::POM_FILE;
use crate::model::{is_listed, source_glob, SOURCE_EXT};
use anyhow::{Context, Result};
use glob::Pattern;
use regex::Regex;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, trace};

/// Inclusion and exclusion rules for one classification
#[derive(Debug, Clone)]
pub struct ClassifierRules {
    source_glob: Pattern,
    descriptor_name: String,
    white_list: Option<Regex>,
    black_list: Option<Regex>,
}

impl ClassifierRules {
    /// Rules for `*.java` sources in modules described by `pom.xml`
    pub fn new(white_list: Option<Regex>, black_list: Option<Regex>) -> Result<Self> {
        Self::with_names(&format!("*.{SOURCE_EXT}"), POM_FILE, white_list, black_list)
    }

    pub fn with_names(
        source_glob: &str,
        descriptor_name: &str,
        white_list: Option<Regex>,
        black_list: Option<Regex>,
    ) -> Result<Self> {
        let source_glob = Pattern::new(source_glob)
            .with_context(|| format!("Invalid source glob '{}'", source_glob))?;
        Ok(Self {
            source_glob,
            descriptor_name: descriptor_name.to_string(),
            white_list,
            black_list,
        })
    }

    fn is_blacklisted(&self, path: &Path) -> bool {
        is_listed(self.black_list.as_ref(), &path.to_string_lossy())
    }

    fn is_whitelisted(&self, path: &Path) -> bool {
        match &self.white_list {
            Some(re) => re.is_match(&path.to_string_lossy()),
            None => true,
        }
    }
}

/// Directories of a module that contain source files
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub matched_files: usize,
    /// Relative to the module root, `/`-separated, sorted
    pub dirs: BTreeSet<String>,
    /// Set when a nested module descriptor stopped the walk
    pub nested_module_found: bool,
}

impl Classification {
    /// One `<dir>/*.java` glob per source directory, sorted
    pub fn source_globs(&self) -> Vec<String> {
        self.dirs.iter().map(|d| source_glob(d)).collect()
    }
}

struct SourceCollector<'a> {
    rules: &'a ClassifierRules,
    module_root: &'a Path,
    descriptors_seen: usize,
    found: Classification,
}

impl SourceCollector<'_> {
    fn relative(&self, dir: &Path) -> String {
        dir.strip_prefix(self.module_root)
            .map(|rel| {
                rel.components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect::<Vec<_>>()
                    .join("/")
            })
            .unwrap_or_default()
    }
}

impl Visitor for SourceCollector<'_> {
    fn enter_dir(&mut self, dir: &Path) -> Visit {
        if self.rules.is_blacklisted(dir) {
            trace!(dir = %dir.display(), "Skipping blacklisted directory");
            return Visit::SkipSubtree;
        }
        Visit::Descend
    }

    fn visit_file(&mut self, entry: &DirEntry) -> Visit {
        if entry.name == self.rules.descriptor_name {
            self.descriptors_seen += 1;
            if self.descriptors_seen > 1 {
                debug!(descriptor = %entry.path.display(), "Nested module found, discarding sources");
                self.found = Classification {
                    nested_module_found: true,
                    ..Classification::default()
                };
                return Visit::Abort;
            }
            return Visit::Descend;
        }

        if !self.rules.is_whitelisted(&entry.path) || !self.rules.source_glob.matches(&entry.name) {
            return Visit::Descend;
        }

        if let Some(parent) = entry.path.parent() {
            if self.rules.is_blacklisted(parent) {
                return Visit::Descend;
            }
            self.found.matched_files += 1;
            let rel = self.relative(parent);
            self.found.dirs.insert(rel);
        }
        Visit::Descend
    }
}

/// Classifies the subtree below `module_root`. A fresh walk is made on
/// every call.
pub fn classify(fs: &dyn FileSystem, module_root: &Path, rules: &ClassifierRules) -> Result<Classification> {
    let mut collector = SourceCollector {
        rules,
        module_root,
        descriptors_seen: 0,
        found: Classification::default(),
    };

    let outcome = walk(fs, module_root, &mut collector)
        .with_context(|| format!("Failed to scan {}", module_root.display()))?;
    if outcome == WalkOutcome::Aborted {
        debug!(module = %module_root.display(), "Classification stopped at a nested module");
    }

    Ok(collector.found)
}
