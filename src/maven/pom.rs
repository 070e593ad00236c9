//! Minimal `pom.xml` model: identity, parent chain, properties and
//! dependency declarations

use crate::error::PipelineError;
use crate::fs::{normalize, FileSystem};
use crate::model::ModuleIdentity;
use anyhow::{Context, Result};
use roxmltree::{Document, Node};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const POM_FILE: &str = "pom.xml";

const DEFAULT_PACKAGING: &str = "jar";
const DEFAULT_RELATIVE_PATH: &str = "../pom.xml";
const MAX_PARENT_DEPTH: usize = 16;
const MAX_INTERPOLATION_PASSES: usize = 8;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParentRef {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub relative_path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PomDependency {
    pub group_id: String,
    pub artifact_id: String,
    pub version: Option<String>,
    pub scope: Option<String>,
    pub dep_type: Option<String>,
    pub classifier: Option<String>,
}

impl PomDependency {
    fn key(&self) -> (String, String) {
        (self.group_id.clone(), self.artifact_id.clone())
    }
}

/// One parsed `pom.xml`, without any inheritance applied
#[derive(Debug, Clone, Default)]
pub struct Pom {
    pub path: PathBuf,
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub packaging: Option<String>,
    pub parent: Option<ParentRef>,
    pub properties: BTreeMap<String, String>,
    pub dependencies: Vec<PomDependency>,
    pub managed_dependencies: Vec<PomDependency>,
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|c| c.is_element() && c.has_tag_name(name))
}

fn child_text(node: Node, name: &str) -> Option<String> {
    child(node, name)
        .and_then(|c| c.text())
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

fn parse_dependencies(node: Option<Node>) -> Vec<PomDependency> {
    let Some(node) = node else {
        return Vec::new();
    };

    node.children()
        .filter(|c| c.is_element() && c.has_tag_name("dependency"))
        .filter_map(|dep| {
            Some(PomDependency {
                group_id: child_text(dep, "groupId")?,
                artifact_id: child_text(dep, "artifactId")?,
                version: child_text(dep, "version"),
                scope: child_text(dep, "scope"),
                dep_type: child_text(dep, "type"),
                classifier: child_text(dep, "classifier"),
            })
        })
        .collect()
}

impl Pom {
    pub fn parse(path: &Path, content: &str) -> Result<Self, PipelineError> {
        let doc = Document::parse(content).map_err(|source| PipelineError::InvalidPom {
            path: path.to_path_buf(),
            source,
        })?;
        let project = doc.root_element();

        let parent = child(project, "parent").map(|p| ParentRef {
            group_id: child_text(p, "groupId"),
            artifact_id: child_text(p, "artifactId"),
            version: child_text(p, "version"),
            relative_path: child(p, "relativePath")
                .map(|r| r.text().unwrap_or("").trim().to_string()),
        });

        let properties = child(project, "properties")
            .map(|props| {
                props
                    .children()
                    .filter(|c| c.is_element())
                    .map(|c| {
                        (
                            c.tag_name().name().to_string(),
                            c.text().unwrap_or("").trim().to_string(),
                        )
                    })
                    .collect()
            })
            .unwrap_or_default();

        let managed_dependencies = parse_dependencies(
            child(project, "dependencyManagement").and_then(|m| child(m, "dependencies")),
        );

        Ok(Self {
            path: path.to_path_buf(),
            group_id: child_text(project, "groupId"),
            artifact_id: child_text(project, "artifactId"),
            version: child_text(project, "version"),
            packaging: child_text(project, "packaging"),
            parent,
            properties,
            dependencies: parse_dependencies(child(project, "dependencies")),
            managed_dependencies,
        })
    }

    pub fn read(fs: &dyn FileSystem, path: &Path) -> Result<Self> {
        let content = fs
            .read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(Self::parse(path, &content)?)
    }

    /// Identity after parent inheritance of `groupId` and `version`
    pub fn identity(&self) -> Result<ModuleIdentity, PipelineError> {
        let parent = self.parent.clone().unwrap_or_default();
        let missing = |field| PipelineError::MissingIdentity {
            field,
            pom: self.path.clone(),
        };

        let group_id = self
            .group_id
            .clone()
            .or(parent.group_id)
            .ok_or_else(|| missing("groupId"))?;
        let artifact_id = self.artifact_id.clone().ok_or_else(|| missing("artifactId"))?;
        let version = self
            .version
            .clone()
            .or(parent.version)
            .ok_or_else(|| missing("version"))?;
        let packaging = self
            .packaging
            .clone()
            .unwrap_or_else(|| DEFAULT_PACKAGING.to_string());

        Ok(ModuleIdentity {
            group_id,
            artifact_id,
            version,
            packaging,
        })
    }

    fn parent_path(&self) -> Option<PathBuf> {
        let parent = self.parent.as_ref()?;
        let relative = match parent.relative_path.as_deref() {
            Some("") => return None,
            Some(rel) => rel,
            None => DEFAULT_RELATIVE_PATH,
        };
        let base = self.path.parent()?;
        let candidate = normalize(&base.join(relative));
        if candidate.extension().is_some_and(|e| e == "xml") {
            Some(candidate)
        } else {
            Some(candidate.join(POM_FILE))
        }
    }

    fn is_parent_of(&self, child: &Pom) -> bool {
        let Some(parent) = child.parent.as_ref() else {
            return false;
        };
        let group = self
            .group_id
            .as_ref()
            .or(self.parent.as_ref().and_then(|p| p.group_id.as_ref()));
        parent.artifact_id.as_ref() == self.artifact_id.as_ref()
            && (parent.group_id.is_none() || parent.group_id.as_ref() == group)
    }
}

/// A pom together with the ancestors reachable through `<relativePath>`
#[derive(Debug, Clone)]
pub struct EffectivePom {
    pub pom: Pom,
    /// Nearest parent first
    pub ancestors: Vec<Pom>,
    properties: BTreeMap<String, String>,
}

impl EffectivePom {
    pub fn load(fs: &dyn FileSystem, path: &Path) -> Result<Self> {
        let pom = Pom::read(fs, path)?;

        let mut ancestors: Vec<Pom> = Vec::new();
        let mut current = pom.clone();
        while ancestors.len() < MAX_PARENT_DEPTH {
            let Some(parent_path) = current.parent_path() else {
                break;
            };
            if !fs.is_file(&parent_path) {
                debug!(pom = %current.path.display(), parent = %parent_path.display(), "Parent pom not available locally");
                break;
            }
            let parent = match Pom::read(fs, &parent_path) {
                Ok(parent) => parent,
                Err(e) => {
                    warn!(parent = %parent_path.display(), error = %e, "Ignoring unreadable parent pom");
                    break;
                }
            };
            if !parent.is_parent_of(&current) {
                debug!(parent = %parent_path.display(), "Pom at relative path is not the declared parent");
                break;
            }
            ancestors.push(parent.clone());
            current = parent;
        }

        Ok(Self::from_chain(pom, ancestors))
    }

    pub fn from_chain(pom: Pom, ancestors: Vec<Pom>) -> Self {
        let mut properties = BTreeMap::new();
        for ancestor in ancestors.iter().rev() {
            properties.extend(ancestor.properties.clone());
        }
        properties.extend(pom.properties.clone());

        if let Ok(identity) = pom.identity() {
            for prefix in ["project", "pom"] {
                properties.insert(format!("{prefix}.groupId"), identity.group_id.clone());
                properties.insert(format!("{prefix}.artifactId"), identity.artifact_id.clone());
                properties.insert(format!("{prefix}.version"), identity.version.clone());
            }
        }
        if let Some(parent) = &pom.parent {
            if let Some(v) = &parent.version {
                properties.insert("project.parent.version".to_string(), v.clone());
            }
            if let Some(g) = &parent.group_id {
                properties.insert("project.parent.groupId".to_string(), g.clone());
            }
        }

        Self {
            pom,
            ancestors,
            properties,
        }
    }

    pub fn identity(&self) -> Result<ModuleIdentity, PipelineError> {
        let identity = self.pom.identity()?;
        Ok(ModuleIdentity {
            group_id: self.interpolate(&identity.group_id),
            artifact_id: self.interpolate(&identity.artifact_id),
            version: self.interpolate(&identity.version),
            packaging: self.interpolate(&identity.packaging),
        })
    }

    /// Expands `${name}` references; unknown names are left in place
    pub fn interpolate(&self, value: &str) -> String {
        let mut current = value.to_string();
        for _ in 0..MAX_INTERPOLATION_PASSES {
            if !current.contains("${") {
                break;
            }
            let mut next = String::with_capacity(current.len());
            let mut rest = current.as_str();
            while let Some(start) = rest.find("${") {
                next.push_str(&rest[..start]);
                let after = &rest[start + 2..];
                match after.find('}') {
                    Some(end) => {
                        let key = &after[..end];
                        match self.properties.get(key) {
                            Some(v) => next.push_str(v),
                            None => {
                                next.push_str("${");
                                next.push_str(key);
                                next.push('}');
                            }
                        }
                        rest = &after[end + 1..];
                    }
                    None => {
                        next.push_str(&rest[start..]);
                        rest = "";
                    }
                }
            }
            next.push_str(rest);
            if next == current {
                break;
            }
            current = next;
        }
        current
    }

    fn managed(&self, dep: &PomDependency) -> Option<&PomDependency> {
        std::iter::once(&self.pom)
            .chain(self.ancestors.iter())
            .flat_map(|p| p.managed_dependencies.iter())
            .find(|m| {
                self.interpolate(&m.group_id) == self.interpolate(&dep.group_id)
                    && self.interpolate(&m.artifact_id) == self.interpolate(&dep.artifact_id)
            })
    }

    /// Declared dependencies, own first then inherited, with versions and
    /// scopes completed from `<dependencyManagement>`. Entries whose
    /// version stays unknown are skipped.
    pub fn dependencies(&self) -> Vec<PomDependency> {
        let mut seen = std::collections::BTreeSet::new();
        let mut resolved = Vec::new();

        let declared = std::iter::once(&self.pom)
            .chain(self.ancestors.iter())
            .flat_map(|p| p.dependencies.iter());

        for dep in declared {
            if !seen.insert(dep.key()) {
                continue;
            }
            let managed = self.managed(dep);
            let version = dep
                .version
                .clone()
                .or_else(|| managed.and_then(|m| m.version.clone()))
                .map(|v| self.interpolate(&v));

            let Some(version) = version.filter(|v| !v.contains("${")) else {
                warn!(
                    pom = %self.pom.path.display(),
                    dependency = %format!("{}:{}", dep.group_id, dep.artifact_id),
                    "Skipping dependency without a resolvable version"
                );
                continue;
            };

            resolved.push(PomDependency {
                group_id: self.interpolate(&dep.group_id),
                artifact_id: self.interpolate(&dep.artifact_id),
                version: Some(version),
                scope: dep
                    .scope
                    .clone()
                    .or_else(|| managed.and_then(|m| m.scope.clone())),
                dep_type: dep.dep_type.clone(),
                classifier: dep.classifier.clone(),
            });
        }
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileSystem;

    const PARENT: &str = r#"<?xml version="1.0"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
  <modelVersion>4.0.0</modelVersion>
  <groupId>com.acme</groupId>
  <artifactId>acme-parent</artifactId>
  <version>1.0</version>
  <packaging>pom</packaging>
  <properties>
    <slf4j.version>1.7.36</slf4j.version>
  </properties>
  <dependencyManagement>
    <dependencies>
      <dependency>
        <groupId>org.slf4j</groupId>
        <artifactId>slf4j-api</artifactId>
        <version>${slf4j.version}</version>
      </dependency>
      <dependency>
        <groupId>junit</groupId>
        <artifactId>junit</artifactId>
        <version>4.13.2</version>
        <scope>test</scope>
      </dependency>
    </dependencies>
  </dependencyManagement>
</project>"#;

    const CHILD: &str = r#"<?xml version="1.0"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
  <modelVersion>4.0.0</modelVersion>
  <parent>
    <groupId>com.acme</groupId>
    <artifactId>acme-parent</artifactId>
    <version>1.0</version>
  </parent>
  <artifactId>widgets</artifactId>
  <dependencies>
    <dependency>
      <groupId>org.slf4j</groupId>
      <artifactId>slf4j-api</artifactId>
    </dependency>
    <dependency>
      <groupId>junit</groupId>
      <artifactId>junit</artifactId>
    </dependency>
    <dependency>
      <groupId>${project.groupId}</groupId>
      <artifactId>gears</artifactId>
      <version>${project.version}</version>
    </dependency>
    <dependency>
      <groupId>org.unknown</groupId>
      <artifactId>mystery</artifactId>
    </dependency>
  </dependencies>
</project>"#;

    #[test]
    fn test_identity_inherits_from_parent() {
        let pom = Pom::parse(Path::new("/mock/widgets/pom.xml"), CHILD).unwrap();
        let identity = pom.identity().unwrap();

        assert_eq!(identity, ModuleIdentity::new("com.acme", "widgets", "1.0", "jar"));
    }

    #[test]
    fn test_missing_artifact_id_is_fatal() {
        let pom = Pom::parse(
            Path::new("pom.xml"),
            "<project><groupId>g</groupId><version>1</version></project>",
        )
        .unwrap();

        let err = pom.identity().unwrap_err();
        assert!(matches!(
            err,
            PipelineError::MissingIdentity {
                field: "artifactId",
                ..
            }
        ));
    }

    #[test]
    fn test_invalid_xml() {
        let err = Pom::parse(Path::new("pom.xml"), "<project>").unwrap_err();
        assert!(matches!(err, PipelineError::InvalidPom { .. }));
    }

    #[test]
    fn test_effective_dependencies() {
        let fs = MockFileSystem::new();
        fs.add_file("pom.xml", PARENT);
        fs.add_file("widgets/pom.xml", CHILD);

        let effective = EffectivePom::load(&fs, Path::new("/mock/widgets/pom.xml")).unwrap();
        assert_eq!(effective.ancestors.len(), 1);

        let deps = effective.dependencies();
        let coords: Vec<String> = deps
            .iter()
            .map(|d| {
                format!(
                    "{}:{}:{}:{}",
                    d.group_id,
                    d.artifact_id,
                    d.version.clone().unwrap_or_default(),
                    d.scope.clone().unwrap_or_default()
                )
            })
            .collect();

        assert_eq!(
            coords,
            vec![
                "org.slf4j:slf4j-api:1.7.36:",
                "junit:junit:4.13.2:test",
                "com.acme:gears:1.0:",
            ]
        );
    }

    #[test]
    fn test_parent_not_on_disk() {
        let fs = MockFileSystem::new();
        fs.add_file("widgets/pom.xml", CHILD);

        let effective = EffectivePom::load(&fs, Path::new("/mock/widgets/pom.xml")).unwrap();

        assert!(effective.ancestors.is_empty());
        assert_eq!(effective.identity().unwrap().version, "1.0");
    }

    #[test]
    fn test_interpolate_leaves_unknown() {
        let pom = Pom::parse(
            Path::new("pom.xml"),
            "<project><groupId>g</groupId><artifactId>a</artifactId><version>2</version>\
             <properties><x>${y}</x><y>deep</y></properties></project>",
        )
        .unwrap();
        let effective = EffectivePom::from_chain(pom, Vec::new());

        assert_eq!(effective.interpolate("${x}-${project.version}"), "deep-2");
        assert_eq!(effective.interpolate("${nope}"), "${nope}");
        assert_eq!(effective.interpolate("${open"), "${open");
    }
}
