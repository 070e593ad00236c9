//! Pass 4: merge every shard of the tree into the root WORKSPACE

use crate::fs::{find_files_excluding, read_optional, FileSystem};
use crate::model::{sanitize, DependencyRecord, RepositoryRecord};
use crate::pipeline::context::PipelineContext;
use crate::pipeline::files::{
    read_json, DEPENDENCY_SHARD, EXCLUDED_DIRS, SERVER_SHARD, WORKSPACE, WORKSPACE_APPEND,
    WORKSPACE_PREPEND,
};
use crate::pipeline::phase_trait::TreePhase;
use crate::render::{Fields, TemplateKind, TemplateSet, INDENT_1, INDENT_2};
use anyhow::Result;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Dependencies and servers of the whole tree. The first shard to declare
/// a key determines its record.
#[derive(Debug, Clone, Default)]
pub struct WorkspaceInputs {
    pub dependencies: BTreeMap<String, DependencyRecord>,
    pub servers: BTreeMap<String, RepositoryRecord>,
}

impl WorkspaceInputs {
    pub fn collect(fs: &dyn FileSystem, root: &Path) -> Result<Self> {
        let mut inputs = Self::default();

        let shards = find_files_excluding(fs, root, EXCLUDED_DIRS, |e| e.name == DEPENDENCY_SHARD)?;
        for path in shards {
            let shard: Vec<DependencyRecord> = read_json(fs, &path)?;
            debug!(shard = %path.display(), dependencies = shard.len(), "Read dependency shard");
            for dep in shard {
                inputs.dependencies.entry(dep.name.clone()).or_insert(dep);
            }
        }

        let shards = find_files_excluding(fs, root, EXCLUDED_DIRS, |e| e.name == SERVER_SHARD)?;
        for path in shards {
            let shard: Vec<RepositoryRecord> = read_json(fs, &path)?;
            debug!(shard = %path.display(), servers = shard.len(), "Read server shard");
            for server in shard {
                inputs.servers.entry(server.name.clone()).or_insert(server);
            }
        }

        Ok(inputs)
    }
}

#[derive(Debug, Clone, Default)]
pub struct WorkspaceOptions {
    pub name: Option<String>,
    pub prepend: String,
    pub append: String,
}

fn render_servers(templates: &TemplateSet, inputs: &WorkspaceInputs) -> Result<String> {
    let template = templates.get(TemplateKind::Server);
    let mut out = String::new();
    for server in inputs.servers.values() {
        let fields = Fields::new()
            .set("SERVER_NAME", sanitize(&server.name))
            .set("SERVER_URL", server.url.as_str())
            .optional("SETTINGS_FILE", server.settings_file.clone());
        out.push_str(&template.render(&fields)?);
    }
    Ok(out)
}

fn render_maven_install(inputs: &WorkspaceInputs) -> String {
    let mut out = String::from("maven_install(\n");
    out.push_str(&format!("{INDENT_1}artifacts = [\n"));
    for dep in inputs.dependencies.values() {
        out.push_str(&format!("{INDENT_2}\"{}\",\n", dep.coordinates()));
    }
    out.push_str(&format!("{INDENT_1}],\n"));
    out.push_str(&format!("{INDENT_1}repositories = [\n"));
    for server in inputs.servers.values() {
        out.push_str(&format!("{INDENT_2}\"{}\",\n", server.url));
    }
    out.push_str(&format!("{INDENT_1}],\n"));
    out.push_str(")\n");
    out
}

/// Renders the WORKSPACE text
pub fn render_workspace(
    templates: &TemplateSet,
    inputs: &WorkspaceInputs,
    options: &WorkspaceOptions,
) -> Result<String> {
    let mut out = String::new();

    if let Some(name) = options.name.as_deref().filter(|n| !n.is_empty()) {
        out.push_str(&format!("workspace(name = \"{name}\")\n\n"));
    }
    if !options.prepend.is_empty() {
        out.push_str(&options.prepend);
        out.push('\n');
    }

    let servers = render_servers(templates, inputs)?;
    if !servers.is_empty() {
        out.push_str(&servers);
        out.push('\n');
    }

    out.push_str(
        &templates
            .get(TemplateKind::RulesJvmExternal)
            .render(&Fields::new())?,
    );
    out.push_str(&render_maven_install(inputs));

    if !options.append.is_empty() {
        out.push('\n');
        out.push_str(&options.append);
    }
    Ok(out)
}

/// Writes `WORKSPACE` at the tree root. An existing file is left alone
/// unless a backup suffix is active, in which case it is moved aside once
/// the new content has been rendered. Returns the written path.
pub fn synthesize_workspace(
    context: &PipelineContext,
    name: Option<&str>,
) -> Result<Option<PathBuf>> {
    let fs = context.fs();
    let path = context.root.join(WORKSPACE);

    if fs.exists(&path) && context.backup_suffix().is_none() {
        warn!(path = %path.display(), "WORKSPACE already exists, use --backup or --suffix to regenerate it");
        return Ok(None);
    }

    let inputs = WorkspaceInputs::collect(fs, &context.root)?;
    let options = WorkspaceOptions {
        name: name.map(str::to_string),
        prepend: read_optional(fs, &context.root.join(WORKSPACE_PREPEND))?,
        append: read_optional(fs, &context.root.join(WORKSPACE_APPEND))?,
    };
    let content = render_workspace(&context.templates, &inputs, &options)?;

    context.backup().rename_if_exists(fs, &path)?;
    fs.write(&path, &content)?;

    info!(
        path = %path.display(),
        dependencies = inputs.dependencies.len(),
        servers = inputs.servers.len(),
        "WORKSPACE written"
    );
    Ok(Some(path))
}

#[derive(Debug, Clone, Default)]
pub struct WorkspacePhase {
    pub name: Option<String>,
}

impl TreePhase for WorkspacePhase {
    fn name(&self) -> &'static str {
        "workspace"
    }

    fn execute(&self, context: &PipelineContext) -> Result<()> {
        synthesize_workspace(context, self.name.as_deref()).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::is_fatal;
    use crate::fs::{FileSystem, MockFileSystem};
    use crate::pipeline::context::test_support::context;
    use std::sync::Arc;

    const APP_DEPS: &str = r#"[
  {"name": "com_google_guava_guava_33_0", "groupId": "com.google.guava", "artifactId": "guava", "version": "33.0", "scope": "compile"},
  {"name": "org_slf4j_slf4j_api_2_0", "groupId": "org.slf4j", "artifactId": "slf4j-api", "version": "2.0", "scope": "compile"}
]"#;
    const LIB_DEPS: &str = r#"[
  {"name": "org_slf4j_slf4j_api_2_0", "groupId": "org.slf4j", "artifactId": "slf4j-api", "version": "2.0", "scope": "test"}
]"#;
    const SERVERS: &str = r#"[
  {"name": "my-nexus", "url": "https://nexus.acme.com/repo", "settingsFile": "/home/dev/.m2/settings.xml"}
]"#;

    fn tree() -> Arc<MockFileSystem> {
        let fs = Arc::new(MockFileSystem::new());
        fs.add_file("app/tmp-bzl-dependency.json", APP_DEPS);
        fs.add_file("lib/tmp-bzl-dependency.json", LIB_DEPS);
        fs.add_file("app/tmp-bzl-server.json", SERVERS);
        fs.add_file("lib/tmp-bzl-server.json", "[]");
        fs
    }

    #[test]
    fn test_collect_first_seen_wins() {
        let fs = tree();
        let inputs = WorkspaceInputs::collect(fs.as_ref(), Path::new("/mock")).unwrap();

        assert_eq!(inputs.dependencies.len(), 2);
        assert_eq!(
            inputs.dependencies["org_slf4j_slf4j_api_2_0"].scope.as_deref(),
            Some("compile")
        );
        assert_eq!(inputs.servers.len(), 1);
    }

    #[test]
    fn test_workspace_layout() {
        let fs = tree();
        fs.add_file("bzl-workspace-prepend.txt", "# generated");
        fs.add_file("bzl-workspace-append.txt", "register_toolchains(\"//:jdk\")\n");
        let ctx = context(fs.clone(), None);

        synthesize_workspace(&ctx, Some("acme")).unwrap();
        let workspace = fs.content("WORKSPACE").unwrap();

        assert!(workspace.starts_with(
            "workspace(name = \"acme\")\n\n# generated\nmaven_server(\n    name = \"my_nexus\",\n"
        ));
        assert!(workspace.contains("    settings_file = \"/home/dev/.m2/settings.xml\",\n)\n\nload("));
        assert!(workspace.contains(
            "maven_install(\n    artifacts = [\n        \"com.google.guava:guava:33.0\",\n        \"org.slf4j:slf4j-api:2.0\",\n    ],\n    repositories = [\n        \"https://nexus.acme.com/repo\",\n    ],\n)\n"
        ));
        assert!(workspace.ends_with(")\n\nregister_toolchains(\"//:jdk\")\n"));
    }

    #[test]
    fn test_server_without_settings_file() {
        let fs = Arc::new(MockFileSystem::new());
        fs.add_file(
            "tmp-bzl-server.json",
            r#"[{"name": "central", "url": "https://repo1.maven.org/maven2"}]"#,
        );
        let ctx = context(fs.clone(), None);

        synthesize_workspace(&ctx, None).unwrap();
        let workspace = fs.content("WORKSPACE").unwrap();

        assert!(workspace.starts_with("maven_server(\n    name = \"central\",\n    url = \"https://repo1.maven.org/maven2\",\n)\n"));
        assert!(!workspace.contains("settings_file"));
    }

    #[test]
    fn test_existing_workspace_without_backup_is_kept() {
        let fs = tree();
        fs.add_file("WORKSPACE", "# mine\n");
        let ctx = context(fs.clone(), None);

        let written = synthesize_workspace(&ctx, None).unwrap();

        assert!(written.is_none());
        assert_eq!(fs.content("WORKSPACE").as_deref(), Some("# mine\n"));
    }

    #[test]
    fn test_existing_workspace_moved_aside_with_suffix() {
        let fs = tree();
        fs.add_file("WORKSPACE", "# mine\n");
        let ctx = context(fs.clone(), Some("2024"));

        let written = synthesize_workspace(&ctx, None).unwrap();

        assert_eq!(written, Some(PathBuf::from("/mock/WORKSPACE")));
        assert_eq!(fs.content("WORKSPACE_2024").as_deref(), Some("# mine\n"));
        assert!(fs.content("WORKSPACE").unwrap().contains("maven_install("));
    }

    #[test]
    fn test_malformed_shard_is_fatal() {
        let fs = tree();
        fs.add_file("lib/tmp-bzl-server.json", "[{");
        let ctx = context(fs, None);

        let err = synthesize_workspace(&ctx, None).unwrap_err();
        assert!(is_fatal(&err));
    }

    #[test]
    fn test_malformed_shard_keeps_existing_workspace() {
        let fs = tree();
        fs.add_file("WORKSPACE", "# mine\n");
        fs.add_file("lib/tmp-bzl-server.json", "[{");
        let ctx = context(fs.clone(), Some("2024"));

        let err = synthesize_workspace(&ctx, None).unwrap_err();

        assert!(is_fatal(&err));
        assert_eq!(fs.content("WORKSPACE").as_deref(), Some("# mine\n"));
        assert!(!fs.exists(Path::new("/mock/WORKSPACE_2024")));
    }

    #[test]
    fn test_collect_skips_shards_under_build_output() {
        let fs = tree();
        fs.add_file(
            "node_modules/pkg/tmp-bzl-dependency.json",
            r#"[{"name": "com_google_guava_guava_1_0", "groupId": "com.google.guava", "artifactId": "guava", "version": "1.0"}]"#,
        );
        fs.add_file("app/target/tmp-bzl-server.json", "[{");

        let inputs = WorkspaceInputs::collect(fs.as_ref(), Path::new("/mock")).unwrap();

        assert_eq!(inputs.dependencies.len(), 2);
        assert!(!inputs.dependencies.contains_key("com_google_guava_guava_1_0"));
        assert_eq!(inputs.servers.len(), 1);
    }
}
