pub mod backup;
pub mod classify;
pub mod clean;
pub mod context;
pub mod discover;
pub mod files;
pub mod manifest;
pub mod orchestrator;
pub mod phase_trait;
pub mod phases;
pub mod resolve;

pub use backup::{resolve_suffix, Backup};
pub use classify::{classify, Classification, ClassifierRules};
pub use context::PipelineContext;
pub use discover::discover_modules;
pub use manifest::GlobalManifest;
pub use orchestrator::{full_run, PipelineOrchestrator, RunSummary, Step};
pub use phase_trait::{ModulePhase, TreePhase};
