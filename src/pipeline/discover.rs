//! Discovery of module directories below a tree root

use crate::maven::POM_FILE;
use crate::model::is_listed;
use crate::pipeline::files::{relative_dir, EXCLUDED_DIRS};
use anyhow::{Context, Result};
use ignore::{overrides::OverrideBuilder, WalkBuilder};
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Every directory below `root` holding a `pom.xml`, sorted by path.
/// `black_list` is matched against the path relative to `root` with a
/// leading `/`, and `.gitignore` rules apply.
pub fn discover_modules(root: &Path, black_list: Option<&Regex>) -> Result<Vec<PathBuf>> {
    let mut override_builder = OverrideBuilder::new(root);
    for excluded in EXCLUDED_DIRS {
        override_builder
            .add(&format!("!{}/", excluded))
            .with_context(|| format!("Invalid exclusion for {}", excluded))?;
    }
    let overrides = override_builder
        .build()
        .context("Failed to build directory exclusions")?;

    let mut modules = Vec::new();
    for result in WalkBuilder::new(root)
        .hidden(false)
        .git_ignore(true)
        .require_git(false)
        .follow_links(false)
        .overrides(overrides)
        .build()
    {
        let entry = match result {
            Ok(e) => e,
            Err(err) => {
                warn!(error = %err, "Failed to read directory entry");
                continue;
            }
        };

        if entry.file_name() != POM_FILE || !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let Some(dir) = entry.path().parent() else {
            continue;
        };
        // the root itself is never excluded
        let rel = relative_dir(root, dir)?;
        if !rel.is_empty() && is_listed(black_list, &format!("/{}", rel)) {
            debug!(dir = %dir.display(), "Skipping blacklisted module");
            continue;
        }
        modules.push(dir.to_path_buf());
    }

    modules.sort();
    debug!(root = %root.display(), modules = modules.len(), "Modules discovered");
    Ok(modules)
}
