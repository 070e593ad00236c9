//! Pass 3: emit the module's BUILD file and its dependency and server shards

use crate::fs::{find_files, read_optional};
use crate::maven::{settings, EffectivePom, POM_FILE};
use crate::model::{compile_pattern, glob_expression, ModuleOverrides};
use crate::pipeline::context::PipelineContext;
use crate::pipeline::files::{
    relative_dir, remove_if_exists, write_json, BUILD, BUILD_APPEND, BUILD_PREPEND,
    DEPENDENCY_SHARD, SERVER_SHARD,
};
use crate::pipeline::manifest::GlobalManifest;
use crate::pipeline::phase_trait::ModulePhase;
use crate::pipeline::resolve::{dedup_servers, dependency_records, rule_references, Enrichment};
use crate::render::{resource_list, rule_refs, Fields, TemplateKind};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct BuildResult {
    pub build_file: PathBuf,
    /// False when the module has no sources and only the prepend block
    /// was written
    pub buildable: bool,
    pub dependencies: usize,
    pub servers: usize,
    pub references: Vec<String>,
}

/// Files below `dir`, relative to `module_dir`, in walk order
pub fn resource_files(context: &PipelineContext, module_dir: &Path, dir: &str) -> Result<Vec<String>> {
    let fs = context.fs();
    let root = module_dir.join(dir);
    if !fs.is_dir(&root) {
        return Ok(Vec::new());
    }

    find_files(fs, &root, |_| true)?
        .iter()
        .map(|path| relative_dir(module_dir, path))
        .collect()
}

/// Generates `BUILD`, `tmp-bzl-dependency.json` and `tmp-bzl-server.json`
/// for one module against the given manifest
pub fn generate_build(
    context: &PipelineContext,
    module_dir: &Path,
    manifest: &GlobalManifest,
) -> Result<BuildResult> {
    let fs = context.fs();
    let identity = EffectivePom::load(fs, &module_dir.join(POM_FILE))?.identity()?;
    let name = identity.derived_name();
    let overrides = ModuleOverrides::load(fs, module_dir)?;
    let black_list = compile_pattern(
        overrides
            .dependency_black_list(context.config.dep_black_list.as_deref())
            .as_deref(),
    )?;

    let prepend = read_optional(fs, &module_dir.join(BUILD_PREPEND))?;
    let append = read_optional(fs, &module_dir.join(BUILD_APPEND))?;
    let build_file = module_dir.join(BUILD);
    context.backup().copy_if_exists(fs, &build_file)?;

    let mut content = String::new();
    if !prepend.is_empty() {
        content.push_str(&prepend);
        content.push('\n');
    }

    let entry = match manifest.get(&name).filter(|e| e.is_buildable()) {
        Some(entry) => entry,
        None => {
            fs.write(&build_file, &content)?;
            remove_if_exists(fs, &module_dir.join(DEPENDENCY_SHARD))?;
            remove_if_exists(fs, &module_dir.join(SERVER_SHARD))?;
            info!(module = %name, "No sources, wrote BUILD without a library rule");
            return Ok(BuildResult {
                build_file,
                buildable: false,
                dependencies: 0,
                servers: 0,
                references: Vec::new(),
            });
        }
    };

    let artifacts = context
        .dependency_source
        .artifacts(fs, module_dir)
        .with_context(|| format!("Failed to list dependencies of {}", identity.coordinates()))?;
    debug!(
        module = %name,
        source = context.dependency_source.name(),
        artifacts = artifacts.len(),
        "Dependencies listed"
    );

    let local_repository = context.local_repository();
    let enrichment = Enrichment {
        scope: context.config.add_scope,
        hash: context.config.add_hash,
        server: context.config.add_server,
        default_server: &context.config.default_server,
        local_repository: &local_repository,
    };
    let dependencies = dependency_records(fs, artifacts, black_list.as_ref(), &enrichment)?;
    let references = rule_references(&dependencies, manifest, &overrides);
    let servers = dedup_servers(settings::read_servers(fs, &context.config.settings_file)?);

    let resources = resource_files(context, module_dir, &context.config.res_main)?;
    let fields = Fields::new()
        .set("LIB_NAME", name.as_str())
        .set("SRCS_GLOB", glob_expression(&entry.sources))
        .set("RES_FILES", resource_list(&resources))
        .set("JAVA_DEPS", rule_refs(&references));
    content.push_str(&context.templates.get(TemplateKind::Library).render(&fields)?);
    content.push_str(&append);

    fs.write(&build_file, &content)?;
    let shard: Vec<_> = dependencies.values().collect();
    write_json(fs, &module_dir.join(DEPENDENCY_SHARD), &shard)?;
    write_json(fs, &module_dir.join(SERVER_SHARD), &servers)?;

    info!(
        module = %name,
        dependencies = dependencies.len(),
        references = references.len(),
        servers = servers.len(),
        "BUILD written"
    );

    Ok(BuildResult {
        build_file,
        buildable: true,
        dependencies: dependencies.len(),
        servers: servers.len(),
        references,
    })
}

pub struct GenerateBuildPhase;

impl ModulePhase for GenerateBuildPhase {
    fn name(&self) -> &'static str {
        "build"
    }

    fn execute(&self, context: &PipelineContext, module_dir: &Path) -> Result<()> {
        let manifest = context.manifest()?;
        generate_build(context, module_dir, &manifest).map(|_| ())
    }
}
