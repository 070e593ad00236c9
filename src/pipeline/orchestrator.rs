use super::context::PipelineContext;
use super::phase_trait::{ModulePhase, TreePhase};
use super::phases::{
    build::GenerateBuildPhase, meta::AggregatePhase, module::DescribeModulePhase,
    workspace::WorkspacePhase,
};
use crate::error::is_fatal;
use crate::progress::{ProgressEvent, ProgressHandler};
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub enum Step {
    PerModule(Box<dyn ModulePhase>),
    Tree(Box<dyn TreePhase>),
}

impl Step {
    fn name(&self) -> &'static str {
        match self {
            Step::PerModule(phase) => phase.name(),
            Step::Tree(phase) => phase.name(),
        }
    }
}

/// The four passes of a complete run
pub fn full_run(workspace_name: Option<String>) -> Vec<Step> {
    vec![
        Step::PerModule(Box::new(DescribeModulePhase)),
        Step::Tree(Box::new(AggregatePhase)),
        Step::PerModule(Box::new(GenerateBuildPhase)),
        Step::Tree(Box::new(WorkspacePhase {
            name: workspace_name,
        })),
    ]
}

#[derive(Debug, Clone)]
pub struct ModuleFailure {
    pub phase: &'static str,
    pub module: PathBuf,
    pub error: String,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub modules: usize,
    pub failures: Vec<ModuleFailure>,
    pub total_time: Duration,
}

impl RunSummary {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct PipelineOrchestrator {
    progress_handler: Option<Arc<dyn ProgressHandler>>,
}

impl PipelineOrchestrator {
    pub fn new(progress_handler: Option<Arc<dyn ProgressHandler>>) -> Self {
        Self { progress_handler }
    }

    fn emit(&self, event: ProgressEvent) {
        if let Some(handler) = &self.progress_handler {
            handler.on_progress(&event);
        }
    }

    /// Runs `steps` in order. A module-scoped failure is reported and the
    /// remaining modules still run; a fatal failure or a failing tree pass
    /// aborts the run.
    pub fn execute(
        &self,
        context: &PipelineContext,
        modules: &[PathBuf],
        steps: &[Step],
    ) -> Result<RunSummary> {
        let start = Instant::now();
        info!(
            "Starting generation for {} ({} modules)",
            context.root.display(),
            modules.len()
        );
        self.emit(ProgressEvent::Started {
            root: context.root.display().to_string(),
            modules: modules.len(),
        });

        let mut failures = Vec::new();
        for step in steps {
            let phase_name = step.name();
            info!("Phase: {}", phase_name);
            self.emit(ProgressEvent::PhaseStarted {
                phase: phase_name.to_string(),
            });

            let phase_start = Instant::now();
            let outcome = match step {
                Step::PerModule(phase) => self.run_per_module(context, phase.as_ref(), modules, &mut failures),
                Step::Tree(phase) => phase.execute(context),
            }
            .with_context(|| format!("Phase {} failed", phase_name));

            if let Err(e) = outcome {
                self.emit(ProgressEvent::Failed {
                    error: format!("{:#}", e),
                });
                return Err(e);
            }

            self.emit(ProgressEvent::PhaseComplete {
                phase: phase_name.to_string(),
                duration: phase_start.elapsed(),
            });
            debug!("Phase {} complete", phase_name);
        }

        let summary = RunSummary {
            modules: modules.len(),
            failures,
            total_time: start.elapsed(),
        };
        self.emit(ProgressEvent::Completed {
            modules: summary.modules,
            failures: summary.failures.len(),
            total_time: summary.total_time,
        });
        Ok(summary)
    }

    fn run_per_module(
        &self,
        context: &PipelineContext,
        phase: &dyn ModulePhase,
        modules: &[PathBuf],
        failures: &mut Vec<ModuleFailure>,
    ) -> Result<()> {
        let total = modules.len();
        for (index, module_dir) in modules.iter().enumerate() {
            let module = context
                .rel_dir(module_dir)
                .unwrap_or_else(|_| module_dir.display().to_string());

            match phase.execute(context, module_dir) {
                Ok(()) => self.emit(ProgressEvent::ModuleComplete {
                    phase: phase.name().to_string(),
                    module,
                    index: index + 1,
                    total,
                }),
                Err(e) if is_fatal(&e) => {
                    return Err(e).with_context(|| format!("Module {} failed", module_dir.display()));
                }
                Err(e) => {
                    self.emit(ProgressEvent::ModuleFailed {
                        phase: phase.name().to_string(),
                        module,
                        error: format!("{:#}", e),
                    });
                    failures.push(ModuleFailure {
                        phase: phase.name(),
                        module: module_dir.clone(),
                        error: format!("{:#}", e),
                    });
                }
            }
        }
        Ok(())
    }
}
