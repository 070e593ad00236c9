//! Shared fixtures for integration tests
#![allow(dead_code)]

use bazelize::BazelizeConfig;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().expect("relative path has a parent"))
        .expect("Failed to create parent directories");
    fs::write(path, content).expect("Failed to write fixture file");
}

pub fn read(root: &Path, rel: &str) -> String {
    fs::read_to_string(root.join(rel)).unwrap_or_else(|e| panic!("Failed to read {}: {}", rel, e))
}

pub fn pom(artifact_id: &str, packaging: &str, dependencies: &[(&str, &str, &str, Option<&str>)]) -> String {
    let mut deps = String::new();
    for (group_id, dep_artifact, version, scope) in dependencies {
        deps.push_str(&format!(
            "    <dependency>\n      <groupId>{group_id}</groupId>\n      <artifactId>{dep_artifact}</artifactId>\n      <version>{version}</version>\n"
        ));
        if let Some(scope) = scope {
            deps.push_str(&format!("      <scope>{scope}</scope>\n"));
        }
        deps.push_str("    </dependency>\n");
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
  <modelVersion>4.0.0</modelVersion>
  <groupId>com.acme</groupId>
  <artifactId>{artifact_id}</artifactId>
  <version>1.0</version>
  <packaging>{packaging}</packaging>
  <dependencies>
{deps}  </dependencies>
</project>
"#
    )
}

/// Parent aggregator with two modules: `app` depends on `core`, on junit
/// for tests and on a blacklisted `jdk.tools` artifact
pub fn maven_tree() -> (TempDir, PathBuf) {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let root = fs::canonicalize(temp.path()).expect("Failed to canonicalize temp dir");

    write(&root, "pom.xml", &pom("parent", "pom", &[]));

    write(
        &root,
        "core/pom.xml",
        &pom(
            "core",
            "jar",
            &[("com.google.guava", "guava", "32.1.2-jre", None)],
        ),
    );
    write(
        &root,
        "core/src/main/java/com/acme/core/Core.java",
        "package com.acme.core;\n\npublic class Core {}\n",
    );
    write(&root, "core/src/main/resources/core.properties", "enabled=true\n");

    write(
        &root,
        "app/pom.xml",
        &pom(
            "app",
            "jar",
            &[
                ("com.acme", "core", "1.0", None),
                ("junit", "junit", "4.13.2", Some("test")),
                ("jdk.tools", "jdk.tools", "1.8", Some("system")),
            ],
        ),
    );
    write(
        &root,
        "app/src/main/java/com/acme/app/App.java",
        "package com.acme.app;\n\npublic class App {}\n",
    );
    write(
        &root,
        "app/src/test/java/com/acme/app/AppTest.java",
        "package com.acme.app;\n\npublic class AppTest {}\n",
    );

    (temp, root)
}

/// Environment-independent configuration rooted in the temp dir
pub fn config(root: &Path) -> BazelizeConfig {
    BazelizeConfig {
        src_white_list: Some("src/".to_string()),
        src_black_list: Some("/test|/integration-test|/target".to_string()),
        dep_black_list: Some("^jdk_tools".to_string()),
        default_server: "central".to_string(),
        res_main: "src/main/resources".to_string(),
        src_test: "src/test/java".to_string(),
        res_test: "src/test/resources".to_string(),
        settings_file: root.join(".m2/settings.xml"),
        local_repository: root.join(".m2/repository"),
        template_dir: None,
        add_scope: true,
        add_hash: false,
        add_server: false,
        log_level: "info".to_string(),
    }
}
