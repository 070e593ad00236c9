//! Progress handler trait and events

use std::time::Duration;

/// Events emitted while the passes run over a tree
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Run started
    Started { root: String, modules: usize },

    /// A pass started
    PhaseStarted { phase: String },

    /// A pass finished
    PhaseComplete { phase: String, duration: Duration },

    /// A per-module pass finished one module
    ModuleComplete {
        phase: String,
        module: String,
        index: usize,
        total: usize,
    },

    /// A per-module pass failed on one module and moved on
    ModuleFailed {
        phase: String,
        module: String,
        error: String,
    },

    /// Run completed
    Completed {
        modules: usize,
        failures: usize,
        total_time: Duration,
    },

    /// Run aborted
    Failed { error: String },
}

/// Trait for handling progress events during a run
pub trait ProgressHandler: Send + Sync {
    /// Called when a progress event occurs
    fn on_progress(&self, event: &ProgressEvent);
}

/// No-op handler that ignores all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpHandler;

impl ProgressHandler for NoOpHandler {
    fn on_progress(&self, _event: &ProgressEvent) {}
}
