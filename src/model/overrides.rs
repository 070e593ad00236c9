//! Per-module overrides read from `bzl-build-dependency.json`

use crate::error::PipelineError;
use crate::fs::{read_optional, FileSystem};
use anyhow::Result;
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;

pub const OVERRIDES_FILE: &str = "bzl-build-dependency.json";

/// Separator used to OR-join pattern fragments
const SEP_PATTERN: &str = "|";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleOverrides {
    pub src_white_list: Option<Vec<String>>,
    pub src_black_list: Option<Vec<String>>,
    pub dep_black_list: Option<Vec<String>>,
    /// Raw rule references placed ahead of the resolved ones
    #[serde(default)]
    pub add_dep: Vec<String>,
    /// Rule references never emitted
    #[serde(default)]
    pub remove_dep: BTreeSet<String>,
}

impl ModuleOverrides {
    /// Reads the overrides file of `module_dir`; an absent or empty file
    /// means no overrides
    pub fn load(fs: &dyn FileSystem, module_dir: &Path) -> Result<Self> {
        let path = module_dir.join(OVERRIDES_FILE);
        let data = read_optional(fs, &path)?;
        if data.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_json::from_str(&data)
            .map_err(|source| PipelineError::MalformedState { path, source }.into())
    }

    pub fn source_white_list(&self, base: Option<&str>) -> Option<String> {
        join_patterns(base, self.src_white_list.as_deref())
    }

    pub fn source_black_list(&self, base: Option<&str>) -> Option<String> {
        join_patterns(base, self.src_black_list.as_deref())
    }

    /// The dependency blacklist falls back to `srcBlackList` when
    /// `depBlackList` is not given
    pub fn dependency_black_list(&self, base: Option<&str>) -> Option<String> {
        let extra = self
            .dep_black_list
            .as_deref()
            .or(self.src_black_list.as_deref());
        join_patterns(base, extra)
    }
}

/// OR-joins `extra` onto `base`. Empty or absent fragments leave `base` as is.
pub fn join_patterns(base: Option<&str>, extra: Option<&[String]>) -> Option<String> {
    let base = base.filter(|b| !b.is_empty());
    let extra: Vec<&str> = extra
        .unwrap_or_default()
        .iter()
        .map(String::as_str)
        .filter(|s| !s.is_empty())
        .collect();

    match (base, extra.is_empty()) {
        (base, true) => base.map(str::to_string),
        (None, false) => Some(extra.join(SEP_PATTERN)),
        (Some(base), false) => Some(format!("{base}{SEP_PATTERN}{}", extra.join(SEP_PATTERN))),
    }
}

/// Compiles an optional pattern. An invalid pattern is fatal.
pub fn compile_pattern(pattern: Option<&str>) -> Result<Option<Regex>, PipelineError> {
    match pattern.filter(|p| !p.is_empty()) {
        None => Ok(None),
        Some(p) => Regex::new(p)
            .map(Some)
            .map_err(|source| PipelineError::InvalidPattern {
                pattern: p.to_string(),
                source,
            }),
    }
}

/// True when `pattern` finds a match in `text`; no pattern matches nothing
pub fn is_listed(pattern: Option<&Regex>, text: &str) -> bool {
    pattern.map(|p| p.is_match(text)).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileSystem;

    #[test]
    fn test_join_patterns() {
        let extra = vec!["/generated".to_string(), "/legacy".to_string()];

        assert_eq!(
            join_patterns(Some("/test"), Some(extra.as_slice())).as_deref(),
            Some("/test|/generated|/legacy")
        );
        assert_eq!(
            join_patterns(None, Some(extra.as_slice())).as_deref(),
            Some("/generated|/legacy")
        );
        assert_eq!(join_patterns(Some("/test"), None).as_deref(), Some("/test"));
        assert_eq!(join_patterns(Some(""), Some(&[] as &[String])), None);
    }

    #[test]
    fn test_load_absent_file() {
        let fs = MockFileSystem::new();
        let overrides = ModuleOverrides::load(&fs, Path::new("/mock")).unwrap();
        assert_eq!(overrides, ModuleOverrides::default());
    }

    #[test]
    fn test_load_overrides() {
        let fs = MockFileSystem::new();
        fs.add_file(
            "lib/bzl-build-dependency.json",
            r#"{
                "srcBlackList": ["/gen"],
                "addDep": ["//third_party:lombok"],
                "removeDep": ["@org_slf4j_slf4j_api_1_7_36//jar"]
            }"#,
        );

        let overrides = ModuleOverrides::load(&fs, Path::new("/mock/lib")).unwrap();

        assert_eq!(overrides.add_dep, vec!["//third_party:lombok"]);
        assert!(overrides
            .remove_dep
            .contains("@org_slf4j_slf4j_api_1_7_36//jar"));
        assert_eq!(
            overrides.source_black_list(Some("/test")).as_deref(),
            Some("/test|/gen")
        );
        assert_eq!(
            overrides.dependency_black_list(Some("^jdk_tools")).as_deref(),
            Some("^jdk_tools|/gen")
        );
        assert_eq!(overrides.source_white_list(Some("src/")).as_deref(), Some("src/"));
    }

    #[test]
    fn test_dep_black_list_takes_precedence() {
        let overrides = ModuleOverrides {
            src_black_list: Some(vec!["/gen".to_string()]),
            dep_black_list: Some(vec!["^com_sun_tools".to_string()]),
            ..Default::default()
        };

        assert_eq!(
            overrides.dependency_black_list(Some("^jdk_tools")).as_deref(),
            Some("^jdk_tools|^com_sun_tools")
        );
    }

    #[test]
    fn test_malformed_overrides_are_fatal() {
        let fs = MockFileSystem::new();
        fs.add_file("bzl-build-dependency.json", "{ not json");

        let err = ModuleOverrides::load(&fs, Path::new("/mock")).unwrap_err();
        assert!(crate::error::is_fatal(&err));
    }

    #[test]
    fn test_compile_pattern() {
        assert!(compile_pattern(None).unwrap().is_none());
        assert!(compile_pattern(Some("")).unwrap().is_none());

        let pattern = compile_pattern(Some("^jdk_tools")).unwrap();
        assert!(is_listed(pattern.as_ref(), "jdk_tools_jconsole_1_8"));
        assert!(!is_listed(pattern.as_ref(), "com_acme_jdk_tools"));

        let err = compile_pattern(Some("(")).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidPattern { .. }));
    }
}
