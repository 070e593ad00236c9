use serde::{Deserialize, Serialize};

/// Replacement for every character that may not appear in a rule name
pub const SEP_SANITIZE: char = '_';

/// Replaces every character that is not alphanumeric, `_` or `$` with `_`
///
/// ```
/// use bazelize::model::sanitize;
///
/// assert_eq!(sanitize("com.acme_widgets-core_1.0"), "com_acme_widgets_core_1_0");
/// ```
pub fn sanitize(input: &str) -> String {
    input
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' || c == '$' {
                c
            } else {
                SEP_SANITIZE
            }
        })
        .collect()
}

/// The universal dedup and sort key of a module or dependency
pub fn derived_name(group_id: &str, artifact_id: &str, version: &str) -> String {
    sanitize(&format!(
        "{group_id}{SEP_SANITIZE}{artifact_id}{SEP_SANITIZE}{version}"
    ))
}

/// Maven coordinates of one module, as read from its `pom.xml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleIdentity {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub packaging: String,
}

impl ModuleIdentity {
    pub fn new(group_id: &str, artifact_id: &str, version: &str, packaging: &str) -> Self {
        Self {
            group_id: group_id.to_string(),
            artifact_id: artifact_id.to_string(),
            version: version.to_string(),
            packaging: packaging.to_string(),
        }
    }

    pub fn derived_name(&self) -> String {
        derived_name(&self.group_id, &self.artifact_id, &self.version)
    }

    /// `groupId:artifactId:version`
    pub fn coordinates(&self) -> String {
        format!("{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}
