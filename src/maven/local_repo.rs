//! Lookups in the local Maven repository (`~/.m2/repository`)

use super::ResolvedArtifact;
use crate::fs::FileSystem;
use anyhow::{Context, Result};
use regex::Regex;
use sha1::{Digest, Sha1};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, warn};

const REMOTE_REPOSITORIES: &str = "_remote.repositories";

fn remote_entry_regex() -> &'static Regex {
    static REMOTE_ENTRY: OnceLock<Regex> = OnceLock::new();
    REMOTE_ENTRY.get_or_init(|| {
        Regex::new(r"(?m)^([^#>\s][^>\n]*)>([^=\n]*)=\s*$").expect("Invalid remote repositories regex")
    })
}

#[derive(Debug, Clone)]
pub struct LocalRepository {
    root: PathBuf,
}

impl LocalRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/<group as path>/<artifact>/<version>`
    pub fn artifact_dir(&self, artifact: &ResolvedArtifact) -> PathBuf {
        let mut dir = self.root.clone();
        for segment in artifact.group_id.split('.') {
            dir.push(segment);
        }
        dir.join(&artifact.artifact_id).join(&artifact.version)
    }

    pub fn artifact_path(&self, artifact: &ResolvedArtifact) -> PathBuf {
        self.artifact_dir(artifact).join(artifact.file_name())
    }

    /// Lowercase hex SHA-1 of the artifact file
    pub fn sha1(&self, fs: &dyn FileSystem, artifact: &ResolvedArtifact) -> Result<String> {
        let path = self.artifact_path(artifact);
        let bytes = fs
            .read_bytes(&path)
            .with_context(|| format!("Dependency {} could not be hashed", artifact.coordinates()))?;
        Ok(hex::encode(Sha1::digest(&bytes)))
    }

    /// Repository id recorded in `_remote.repositories` for the artifact
    /// file, or `default_server` when none is recorded
    pub fn server(&self, fs: &dyn FileSystem, artifact: &ResolvedArtifact, default_server: &str) -> String {
        let path = self.artifact_dir(artifact).join(REMOTE_REPOSITORIES);
        let content = match fs.read_to_string(&path) {
            Ok(content) => content,
            Err(_) => {
                warn!(
                    artifact = %artifact.artifact_id,
                    default_server,
                    "Could not locate repository file, using default server"
                );
                return default_server.to_string();
            }
        };

        let file_name = artifact.file_name();
        let recorded = remote_entry_regex()
            .captures_iter(&content)
            .find(|caps| caps[1].trim() == file_name)
            .map(|caps| caps[2].trim().to_string())
            .filter(|server| !server.is_empty());

        match recorded {
            Some(server) => server,
            None => {
                debug!(artifact = %artifact.artifact_id, "No remote recorded, using default server");
                default_server.to_string()
            }
        }
    }
}
