use serde::{Deserialize, Serialize};

/// A remote Maven repository, as stored in `tmp-bzl-server.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryRecord {
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings_file: Option<String>,
}

impl RepositoryRecord {
    pub fn new(name: &str, url: &str, settings_file: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            settings_file: settings_file
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_settings_file_is_absent() {
        let repo = RepositoryRecord::new("central", "https://repo1.maven.org/maven2", Some(""));
        assert_eq!(repo.settings_file, None);

        let json = serde_json::to_string(&repo).unwrap();
        assert_eq!(
            json,
            r#"{"name":"central","url":"https://repo1.maven.org/maven2"}"#
        );
    }

    #[test]
    fn test_settings_file_key() {
        let repo = RepositoryRecord::new("internal", "https://nexus", Some("/home/ci/.m2/settings.xml"));
        let json = serde_json::to_string(&repo).unwrap();
        assert!(json.contains(r#""settingsFile":"/home/ci/.m2/settings.xml""#));
    }
}
