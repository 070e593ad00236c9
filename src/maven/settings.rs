//! Repository servers declared in a Maven `settings.xml`

use crate::fs::{normalize, FileSystem};
use crate::model::RepositoryRecord;
use anyhow::{Context, Result};
use roxmltree::Document;
use std::path::Path;
use tracing::debug;

/// Reads every `<profiles><profile><repositories><repository>` entry.
/// A missing settings file yields no servers.
pub fn read_servers(fs: &dyn FileSystem, settings: &Path) -> Result<Vec<RepositoryRecord>> {
    let settings = normalize(settings);
    if !fs.is_file(&settings) {
        debug!(settings = %settings.display(), "No settings file, no repository servers");
        return Ok(Vec::new());
    }

    let content = fs.read_to_string(&settings)?;
    let settings_path = settings.to_string_lossy().to_string();
    parse_servers(&content, &settings_path)
        .with_context(|| format!("Failed to parse settings {}", settings.display()))
}

pub fn parse_servers(content: &str, settings_path: &str) -> Result<Vec<RepositoryRecord>> {
    let doc = Document::parse(content)?;
    let mut servers = Vec::new();

    for profile in doc.descendants().filter(|n| n.has_tag_name("profile")) {
        let repositories = profile
            .children()
            .filter(|n| n.has_tag_name("repositories"))
            .flat_map(|n| n.children())
            .filter(|n| n.has_tag_name("repository"));

        for repository in repositories {
            let text = |name: &str| {
                repository
                    .children()
                    .find(|c| c.has_tag_name(name))
                    .and_then(|c| c.text())
                    .map(|t| t.trim().to_string())
            };
            if let (Some(id), Some(url)) = (text("id"), text("url")) {
                servers.push(RepositoryRecord::new(&id, &url, Some(settings_path)));
            }
        }
    }

    Ok(servers)
}
