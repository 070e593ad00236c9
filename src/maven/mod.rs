//! Thin adapters over Maven inputs: module descriptors, resolved
//! dependency listings, the local repository and `settings.xml`

pub mod dependency_list;
pub mod local_repo;
pub mod pom;
pub mod settings;

pub use local_repo::LocalRepository;
pub use pom::{EffectivePom, Pom, PomDependency, POM_FILE};

use crate::fs::FileSystem;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// One dependency of a module as reported by a [`DependencySource`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedArtifact {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub scope: Option<String>,
    /// Maven `type`, `jar` unless stated otherwise
    pub packaging: String,
    pub classifier: Option<String>,
}

impl ResolvedArtifact {
    pub fn new(group_id: &str, artifact_id: &str, version: &str) -> Self {
        Self {
            group_id: group_id.to_string(),
            artifact_id: artifact_id.to_string(),
            version: version.to_string(),
            scope: None,
            packaging: "jar".to_string(),
            classifier: None,
        }
    }

    pub fn coordinates(&self) -> String {
        format!("{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }

    /// File name of the artifact inside its local repository directory
    pub fn file_name(&self) -> String {
        let extension = match self.packaging.as_str() {
            "" | "bundle" | "maven-plugin" | "ejb" | "test-jar" => "jar",
            other => other,
        };
        let classifier = match (&self.classifier, self.packaging.as_str()) {
            (Some(c), _) => format!("-{c}"),
            (None, "test-jar") => "-tests".to_string(),
            (None, _) => String::new(),
        };
        format!(
            "{}-{}{}.{}",
            self.artifact_id, self.version, classifier, extension
        )
    }
}

impl From<PomDependency> for ResolvedArtifact {
    fn from(dep: PomDependency) -> Self {
        Self {
            group_id: dep.group_id,
            artifact_id: dep.artifact_id,
            version: dep.version.unwrap_or_default(),
            scope: Some(dep.scope.unwrap_or_else(|| "compile".to_string())),
            packaging: dep.dep_type.unwrap_or_else(|| "jar".to_string()),
            classifier: dep.classifier,
        }
    }
}

/// Supplies the dependency set of one module
pub trait DependencySource: Send + Sync {
    fn name(&self) -> &'static str;

    fn artifacts(&self, fs: &dyn FileSystem, module_dir: &Path) -> Result<Vec<ResolvedArtifact>>;
}

/// Direct dependencies declared in the module's `pom.xml`, completed from
/// the local parent chain
#[derive(Debug, Clone, Default)]
pub struct PomDependencySource;

impl DependencySource for PomDependencySource {
    fn name(&self) -> &'static str {
        "pom"
    }

    fn artifacts(&self, fs: &dyn FileSystem, module_dir: &Path) -> Result<Vec<ResolvedArtifact>> {
        let effective = EffectivePom::load(fs, &module_dir.join(POM_FILE))?;
        Ok(effective
            .dependencies()
            .into_iter()
            .filter(|d| d.scope.as_deref() != Some("import"))
            .map(ResolvedArtifact::from)
            .collect())
    }
}

/// The resolved set written by `mvn dependency:list -DoutputFile=<file>`.
/// A relative path is taken from the module directory.
#[derive(Debug, Clone)]
pub struct DependencyListSource {
    file: PathBuf,
}

impl DependencyListSource {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self { file: file.into() }
    }
}

impl DependencySource for DependencyListSource {
    fn name(&self) -> &'static str {
        "dependency-list"
    }

    fn artifacts(&self, fs: &dyn FileSystem, module_dir: &Path) -> Result<Vec<ResolvedArtifact>> {
        let path = if self.file.is_absolute() {
            self.file.clone()
        } else {
            module_dir.join(&self.file)
        };
        let content = fs
            .read_to_string(&path)
            .with_context(|| format!("Failed to read dependency listing {}", path.display()))?;
        Ok(dependency_list::parse(&content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileSystem;

    #[test]
    fn test_file_name() {
        let mut artifact = ResolvedArtifact::new("io.netty", "netty-handler", "4.1.100.Final");
        assert_eq!(artifact.file_name(), "netty-handler-4.1.100.Final.jar");

        artifact.classifier = Some("linux-x86_64".to_string());
        assert_eq!(
            artifact.file_name(),
            "netty-handler-4.1.100.Final-linux-x86_64.jar"
        );

        let mut tests = ResolvedArtifact::new("com.acme", "core", "1.0");
        tests.packaging = "test-jar".to_string();
        assert_eq!(tests.file_name(), "core-1.0-tests.jar");
    }

    #[test]
    fn test_pom_source_defaults_scope() {
        let fs = MockFileSystem::new();
        fs.add_file(
            "lib/pom.xml",
            r#"<project>
                 <groupId>com.acme</groupId><artifactId>lib</artifactId><version>1.0</version>
                 <dependencies>
                   <dependency><groupId>org.slf4j</groupId><artifactId>slf4j-api</artifactId><version>1.7.36</version></dependency>
                 </dependencies>
               </project>"#,
        );

        let artifacts = PomDependencySource
            .artifacts(&fs, Path::new("/mock/lib"))
            .unwrap();

        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].scope.as_deref(), Some("compile"));
        assert_eq!(artifacts[0].coordinates(), "org.slf4j:slf4j-api:1.7.36");
    }

    #[test]
    fn test_dependency_list_source_relative_path() {
        let fs = MockFileSystem::new();
        fs.add_file(
            "lib/target/deps.txt",
            "The following files have been resolved:\n   junit:junit:jar:4.13.2:test\n",
        );

        let source = DependencyListSource::new("target/deps.txt");
        let artifacts = source.artifacts(&fs, Path::new("/mock/lib")).unwrap();

        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].scope.as_deref(), Some("test"));
    }

    #[test]
    fn test_dependency_list_source_missing_file() {
        let fs = MockFileSystem::new();
        let source = DependencyListSource::new("/mock/deps.txt");

        assert!(source.artifacts(&fs, Path::new("/mock")).is_err());
    }
}
