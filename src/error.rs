//! Classified pipeline failures
//!
//! Passes return `anyhow::Result`. Anything that surfaces as a
//! [`PipelineError`] is fatal for the whole invocation; every other error is
//! scoped to the module being processed.

use crate::render::TemplateError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Required field <{field}> is missing in {pom}")]
    MissingIdentity { field: &'static str, pom: PathBuf },

    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Global manifest not found at {0}; run the meta pass first")]
    MissingManifest(PathBuf),

    #[error("Malformed intermediate file {path}: {source}")]
    MalformedState {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid module descriptor {path}: {source}")]
    InvalidPom {
        path: PathBuf,
        #[source]
        source: roxmltree::Error,
    },

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// Returns true when `err` carries a [`PipelineError`] anywhere in its chain
pub fn is_fatal(err: &anyhow::Error) -> bool {
    err.chain()
        .any(|cause| cause.downcast_ref::<PipelineError>().is_some())
}
