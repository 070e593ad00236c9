//! Pass 2: merge every module record of the tree into the global manifest

use crate::pipeline::context::PipelineContext;
use crate::pipeline::files::META_MANIFEST;
use crate::pipeline::manifest::GlobalManifest;
use crate::pipeline::phase_trait::TreePhase;
use anyhow::Result;
use std::sync::Arc;
use tracing::info;

/// Writes `tmp-bzl-meta.json` at the tree root and caches the result in
/// the context for the build pass
pub fn aggregate(context: &PipelineContext) -> Result<Arc<GlobalManifest>> {
    let fs = context.fs();
    let manifest = GlobalManifest::collect(fs, &context.root)?;

    let path = context.root.join(META_MANIFEST);
    context.backup().rename_if_exists(fs, &path)?;
    manifest.save(fs, &path)?;

    let buildable = manifest.entries().filter(|e| e.is_buildable()).count();
    info!(
        modules = manifest.len(),
        buildable,
        path = %path.display(),
        "Global manifest written"
    );

    Ok(context.set_manifest(manifest))
}

pub struct AggregatePhase;

impl TreePhase for AggregatePhase {
    fn name(&self) -> &'static str {
        "meta"
    }

    fn execute(&self, context: &PipelineContext) -> Result<()> {
        aggregate(context).map(|_| ())
    }
}
