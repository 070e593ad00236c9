//! Dependency and repository resolution for one module
//!
//! Dependencies are keyed by derived name. Blacklisted names are dropped
//! before enrichment and appear nowhere in the module's output. Every other
//! dependency becomes a rule reference: the module label when the global
//! manifest knows a buildable module of that name, the external jar
//! otherwise.

use super::manifest::GlobalManifest;
use crate::fs::FileSystem;
use crate::maven::{LocalRepository, ResolvedArtifact};
use crate::model::{is_listed, DependencyRecord, ModuleOverrides, RepositoryRecord};
use anyhow::Result;
use regex::Regex;
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Which optional fields are attached to each dependency record
#[derive(Debug, Clone, Copy)]
pub struct Enrichment<'a> {
    pub scope: bool,
    pub hash: bool,
    pub server: bool,
    pub default_server: &'a str,
    pub local_repository: &'a LocalRepository,
}

/// Dependency records of one module sorted by derived name. The first
/// artifact of a name wins.
pub fn dependency_records(
    fs: &dyn FileSystem,
    artifacts: Vec<ResolvedArtifact>,
    black_list: Option<&Regex>,
    enrichment: &Enrichment<'_>,
) -> Result<BTreeMap<String, DependencyRecord>> {
    let mut records = BTreeMap::new();

    for artifact in artifacts {
        let mut record =
            DependencyRecord::new(&artifact.group_id, &artifact.artifact_id, &artifact.version);
        if is_listed(black_list, &record.name) {
            debug!(dependency = %record.name, "Dependency blacklisted");
            continue;
        }
        if records.contains_key(&record.name) {
            trace!(dependency = %record.name, "Duplicate dependency ignored");
            continue;
        }

        if enrichment.scope {
            record.scope = artifact.scope.clone();
        }
        if enrichment.hash {
            record.hash = Some(enrichment.local_repository.sha1(fs, &artifact)?);
        }
        if enrichment.server {
            record.server = Some(enrichment.local_repository.server(
                fs,
                &artifact,
                enrichment.default_server,
            ));
        }

        records.insert(record.name.clone(), record);
    }

    Ok(records)
}

/// Rule references in emission order: forced `addDep` entries, then one
/// reference per dependency by derived name. References listed in
/// `removeDep` are suppressed.
pub fn rule_references(
    dependencies: &BTreeMap<String, DependencyRecord>,
    manifest: &GlobalManifest,
    overrides: &ModuleOverrides,
) -> Vec<String> {
    let resolved = dependencies.values().map(|dep| match manifest.label_of(&dep.name) {
        Some(label) => label.to_string(),
        None => dep.external_ref(),
    });

    overrides
        .add_dep
        .iter()
        .cloned()
        .chain(resolved)
        .filter(|reference| {
            let removed = overrides.remove_dep.contains(reference);
            if removed {
                debug!(reference = %reference, "Reference removed by override");
            }
            !removed
        })
        .collect()
}

/// Servers sorted by name; the first server of a name wins
pub fn dedup_servers(servers: Vec<RepositoryRecord>) -> Vec<RepositoryRecord> {
    let mut by_name: BTreeMap<String, RepositoryRecord> = BTreeMap::new();
    for server in servers {
        by_name.entry(server.name.clone()).or_insert(server);
    }
    by_name.into_values().collect()
}
