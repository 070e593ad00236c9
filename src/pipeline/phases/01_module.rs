//! Pass 1: describe one module and record its source directories

use crate::maven::{EffectivePom, POM_FILE};
use crate::model::{compile_pattern, ModuleOverrides, ModuleRecord};
use crate::pipeline::classify::{classify, ClassifierRules};
use crate::pipeline::context::PipelineContext;
use crate::pipeline::files::{write_json, MODULE_RECORD};
use crate::pipeline::phase_trait::ModulePhase;
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct ModuleResult {
    pub path: PathBuf,
    pub record: ModuleRecord,
    pub matched_files: usize,
}

/// Reads the module identity, classifies its sources and writes
/// `tmp-bzl-module.json` into the module directory
pub fn describe_module(context: &PipelineContext, module_dir: &Path) -> Result<ModuleResult> {
    let fs = context.fs();
    let identity = EffectivePom::load(fs, &module_dir.join(POM_FILE))?.identity()?;
    let rel_dir = context.rel_dir(module_dir)?;

    let overrides = ModuleOverrides::load(fs, module_dir)?;
    let white_list = overrides.source_white_list(context.config.src_white_list.as_deref());
    let black_list = overrides.source_black_list(context.config.src_black_list.as_deref());
    debug!(
        module = %identity.coordinates(),
        white_list = ?white_list,
        black_list = ?black_list,
        "Classifying sources"
    );

    let rules = ClassifierRules::new(
        compile_pattern(white_list.as_deref())?,
        compile_pattern(black_list.as_deref())?,
    )?;
    let classification = classify(fs, module_dir, &rules)?;

    let record = ModuleRecord {
        root_dir: context.root.to_string_lossy().into_owned(),
        rel_dir,
        identity,
        sources: classification.source_globs(),
    };

    let path = module_dir.join(MODULE_RECORD);
    write_json(fs, &path, &record)?;

    info!(
        module = %record.derived_name(),
        dir = %record.rel_dir,
        files = classification.matched_files,
        source_dirs = record.sources.len(),
        "Module described"
    );

    Ok(ModuleResult {
        path,
        record,
        matched_files: classification.matched_files,
    })
}

pub struct DescribeModulePhase;

impl ModulePhase for DescribeModulePhase {
    fn name(&self) -> &'static str {
        "module"
    }

    fn execute(&self, context: &PipelineContext, module_dir: &Path) -> Result<()> {
        describe_module(context, module_dir).map(|_| ())
    }
}
