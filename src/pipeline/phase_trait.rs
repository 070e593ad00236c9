use super::context::PipelineContext;
use anyhow::Result;
use std::path::Path;

/// A pass run once per module directory
pub trait ModulePhase: Send + Sync {
    fn name(&self) -> &'static str;

    fn execute(&self, context: &PipelineContext, module_dir: &Path) -> Result<()>;
}

/// A pass run once over the whole tree
pub trait TreePhase: Send + Sync {
    fn name(&self) -> &'static str;

    fn execute(&self, context: &PipelineContext) -> Result<()>;
}
