//! bazelize - Bazel build files for multi-module Maven projects
//!
//! Generation runs in four passes that communicate through small JSON files
//! left in the source tree:
//!
//! 1. **module** describes one module (`tmp-bzl-module.json`)
//! 2. **meta** merges every module record into the global manifest
//!    (`tmp-bzl-meta.json` at the root)
//! 3. **build** writes one module's `BUILD` file and its dependency and
//!    server shards
//! 4. **workspace** merges every shard into the root `WORKSPACE`
//!
//! Two appenders extend the generated files afterwards: a `java_binary` rule
//! on the root `BUILD` and `java_test` rules on a module `BUILD`.
//!
//! # Example Usage
//!
//! ```no_run
//! use bazelize::fs::RealFileSystem;
//! use bazelize::pipeline::{discover_modules, full_run, PipelineContext, PipelineOrchestrator};
//! use bazelize::BazelizeConfig;
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! # fn main() -> anyhow::Result<()> {
//! let root = PathBuf::from("/src/acme");
//! let ctx = PipelineContext::new(Arc::new(RealFileSystem), BazelizeConfig::default(), root.clone(), None)?;
//! let modules = discover_modules(&root, None)?;
//!
//! let summary = PipelineOrchestrator::new(None).execute(&ctx, &modules, &full_run(None))?;
//! println!("{} modules, {} failures", summary.modules, summary.failures.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Project Structure
//!
//! - [`pipeline`]: the passes, their shared context and the orchestrator
//! - [`maven`]: pom.xml, settings.xml and local repository readers
//! - [`model`]: module, dependency and repository records
//! - [`render`]: rule templates
//! - [`fs`]: file system seam used by every pass

pub mod cli;
pub mod config;
pub mod error;
pub mod fs;
pub mod maven;
pub mod model;
pub mod pipeline;
pub mod progress;
pub mod render;
pub mod util;

pub use config::{BazelizeConfig, ConfigError};
pub use error::PipelineError;
pub use util::{init_default, init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
