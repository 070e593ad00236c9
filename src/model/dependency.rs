use super::identity::derived_name;
use serde::{Deserialize, Serialize};

/// One external artifact a module depends on, as stored in
/// `tmp-bzl-dependency.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyRecord {
    pub name: String,
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
}

impl DependencyRecord {
    pub fn new(group_id: &str, artifact_id: &str, version: &str) -> Self {
        Self {
            name: derived_name(group_id, artifact_id, version),
            group_id: group_id.to_string(),
            artifact_id: artifact_id.to_string(),
            version: version.to_string(),
            scope: None,
            hash: None,
            server: None,
        }
    }

    /// Rule reference to the repository-fetched jar
    pub fn external_ref(&self) -> String {
        external_ref(&self.name)
    }

    /// `groupId:artifactId:version`
    pub fn coordinates(&self) -> String {
        format!("{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}

pub fn external_ref(name: &str) -> String {
    format!("@{name}//jar")
}
