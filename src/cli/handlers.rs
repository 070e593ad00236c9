//! Subcommand handlers: build a context from the arguments and run one pass

use super::commands::{
    AllArgs, BinaryArgs, BuildArgs, CleanArgs, CliArgs, Commands, DependencyArgs, ModuleArgs,
    SourceFilterArgs, TestArgs, TreeArgs, WorkspaceArgs,
};
use crate::config::BazelizeConfig;
use crate::error::PipelineError;
use crate::fs::{FileSystem, RealFileSystem};
use crate::maven::DependencyListSource;
use crate::model::compile_pattern;
use crate::pipeline::phases::{binary, build, meta, module, test, workspace};
use crate::pipeline::{
    clean, discover_modules, full_run, resolve_suffix, PipelineContext, PipelineOrchestrator,
};
use crate::progress::LoggingHandler;
use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Runs the selected subcommand and returns the process exit code
pub fn dispatch(args: &CliArgs) -> i32 {
    let result = match &args.command {
        Commands::Module(module_args) => handle_module(args, module_args),
        Commands::Meta(tree_args) => handle_meta(args, tree_args),
        Commands::Build(build_args) => handle_build(args, build_args),
        Commands::Workspace(workspace_args) => handle_workspace(args, workspace_args),
        Commands::All(all_args) => handle_all(args, all_args),
        Commands::Binary(binary_args) => handle_binary(args, binary_args),
        Commands::Test(test_args) => handle_test(args, test_args),
        Commands::Clean(clean_args) => handle_clean(clean_args),
    };

    match result {
        Ok(()) => 0,
        Err(e) => {
            error!("{:#}", e);
            1
        }
    }
}

/// Canonical form of `path`, the current directory when absent
fn resolve_dir(fs: &dyn FileSystem, path: Option<&PathBuf>) -> Result<PathBuf> {
    let path = path.cloned().unwrap_or_else(|| PathBuf::from("."));
    let canonical = fs.canonicalize(&path)?;
    if !fs.is_dir(&canonical) {
        return Err(PipelineError::NotADirectory(canonical).into());
    }
    Ok(canonical)
}

/// Configuration from the environment with command-line overrides applied
pub fn build_config(
    args: &CliArgs,
    filters: Option<&SourceFilterArgs>,
    dependencies: Option<&DependencyArgs>,
) -> Result<BazelizeConfig> {
    let mut config = BazelizeConfig::default();
    let pattern = |value: &String| Some(value.clone()).filter(|v| !v.is_empty());

    if let Some(level) = &args.log_level {
        config.log_level = level.to_lowercase();
    }
    if let Some(dir) = &args.template_dir {
        config.template_dir = Some(dir.clone());
    }

    if let Some(filters) = filters {
        if let Some(white) = &filters.src_white_list {
            config.src_white_list = pattern(white);
        }
        if let Some(black) = &filters.src_black_list {
            config.src_black_list = pattern(black);
        }
    }

    if let Some(deps) = dependencies {
        if let Some(black) = &deps.dep_black_list {
            config.dep_black_list = pattern(black);
        }
        if let Some(scope) = deps.add_scope {
            config.add_scope = scope;
        }
        config.add_hash |= deps.add_hash;
        config.add_server |= deps.add_server;
        if let Some(server) = &deps.default_server {
            config.default_server = server.clone();
        }
        if let Some(settings) = &deps.settings {
            config.settings_file = settings.clone();
        }
        if let Some(repo) = &deps.local_repository {
            config.local_repository = repo.clone();
        }
        if let Some(res_main) = &deps.res_main {
            config.res_main = res_main.clone();
        }
    }

    config.validate()?;
    Ok(config)
}

fn context(
    args: &CliArgs,
    config: BazelizeConfig,
    root: PathBuf,
    dependencies: Option<&DependencyArgs>,
) -> Result<PipelineContext> {
    let suffix = resolve_suffix(
        args.backup,
        args.suffix.as_deref(),
        chrono::Local::now().naive_local(),
    );
    if let Some(suffix) = &suffix {
        info!(suffix = %suffix, "Existing outputs will be backed up");
    }

    let mut ctx = PipelineContext::new(Arc::new(RealFileSystem), config, root, suffix)?;
    if let Some(list) = dependencies.and_then(|d| d.dependency_list.as_ref()) {
        ctx = ctx.with_dependency_source(Arc::new(DependencyListSource::new(list)));
    }
    Ok(ctx)
}

fn module_and_root(
    fs: &dyn FileSystem,
    dir: Option<&PathBuf>,
    root: Option<&PathBuf>,
) -> Result<(PathBuf, PathBuf)> {
    let module_dir = resolve_dir(fs, dir)?;
    let root = resolve_dir(fs, root)?;
    Ok((module_dir, root))
}

fn handle_module(args: &CliArgs, module_args: &ModuleArgs) -> Result<()> {
    let fs = RealFileSystem;
    let (module_dir, root) =
        module_and_root(&fs, module_args.dir.as_ref(), module_args.root.as_ref())?;
    let config = build_config(args, Some(&module_args.filters), None)?;
    let ctx = context(args, config, root, None)?;

    module::describe_module(&ctx, &module_dir)?;
    Ok(())
}

fn handle_meta(args: &CliArgs, tree_args: &TreeArgs) -> Result<()> {
    let root = resolve_dir(&RealFileSystem, tree_args.root.as_ref())?;
    let config = build_config(args, None, None)?;
    let ctx = context(args, config, root, None)?;

    meta::aggregate(&ctx)?;
    Ok(())
}

fn handle_build(args: &CliArgs, build_args: &BuildArgs) -> Result<()> {
    let fs = RealFileSystem;
    let (module_dir, root) =
        module_and_root(&fs, build_args.dir.as_ref(), build_args.root.as_ref())?;
    let config = build_config(args, None, Some(&build_args.dependencies))?;
    let ctx = context(args, config, root, Some(&build_args.dependencies))?;

    let manifest = ctx.manifest()?;
    build::generate_build(&ctx, &module_dir, &manifest)?;
    Ok(())
}

fn handle_workspace(args: &CliArgs, workspace_args: &WorkspaceArgs) -> Result<()> {
    let root = resolve_dir(&RealFileSystem, workspace_args.root.as_ref())?;
    let config = build_config(args, None, None)?;
    let ctx = context(args, config, root, None)?;

    workspace::synthesize_workspace(&ctx, workspace_args.workspace_name.as_deref())?;
    Ok(())
}

fn handle_all(args: &CliArgs, all_args: &AllArgs) -> Result<()> {
    let root = resolve_dir(&RealFileSystem, all_args.root.as_ref())?;
    let config = build_config(args, Some(&all_args.filters), Some(&all_args.dependencies))?;
    let black_list = compile_pattern(config.src_black_list.as_deref())?;
    let modules = discover_modules(&root, black_list.as_ref())?;
    if modules.is_empty() {
        warn!(root = %root.display(), "No pom.xml found below the root");
        return Ok(());
    }

    let ctx = context(args, config, root, Some(&all_args.dependencies))?;
    let orchestrator = PipelineOrchestrator::new(Some(Arc::new(LoggingHandler)));
    let summary = orchestrator.execute(&ctx, &modules, &full_run(all_args.workspace_name.clone()))?;

    for failure in &summary.failures {
        warn!(
            phase = failure.phase,
            module = %failure.module.display(),
            error = %failure.error,
            "Module skipped"
        );
    }
    Ok(())
}

fn handle_binary(args: &CliArgs, binary_args: &BinaryArgs) -> Result<()> {
    let root = resolve_dir(&RealFileSystem, binary_args.root.as_ref())?;
    let config = build_config(args, None, None)?;
    let ctx = context(args, config, root, None)?;

    binary::append_binary(&ctx, &binary_args.main_class, binary_args.bin_name.as_deref())?;
    Ok(())
}

fn handle_test(args: &CliArgs, test_args: &TestArgs) -> Result<()> {
    let module_dir = resolve_dir(&RealFileSystem, test_args.dir.as_ref())?;
    let mut config = build_config(args, None, None)?;
    if let Some(src_test) = &test_args.src_test {
        config.src_test = src_test.clone();
    }
    if let Some(res_test) = &test_args.res_test {
        config.res_test = res_test.clone();
    }
    let ctx = context(args, config, module_dir.clone(), None)?;

    test::append_tests(&ctx, &module_dir)?;
    Ok(())
}

fn handle_clean(clean_args: &CleanArgs) -> Result<()> {
    let fs = RealFileSystem;
    let root = resolve_dir(&fs, clean_args.root.as_ref())?;
    clean::clean(&fs, &root, clean_args.expunge)?;
    Ok(())
}

/// Subcommand name, for startup logging
pub fn command_name(args: &CliArgs) -> &'static str {
    match args.command {
        Commands::Module(_) => "module",
        Commands::Meta(_) => "meta",
        Commands::Build(_) => "build",
        Commands::Workspace(_) => "workspace",
        Commands::All(_) => "all",
        Commands::Binary(_) => "binary",
        Commands::Test(_) => "test",
        Commands::Clean(_) => "clean",
    }
}
