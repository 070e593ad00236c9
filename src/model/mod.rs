//! Records exchanged between passes

pub mod dependency;
pub mod descriptor;
pub mod identity;
pub mod overrides;
pub mod repository;

pub use dependency::{external_ref, DependencyRecord};
pub use descriptor::{glob_expression, source_glob, ManifestEntry, ModuleRecord, SOURCE_EXT};
pub use identity::{derived_name, sanitize, ModuleIdentity};
pub use overrides::{compile_pattern, is_listed, join_patterns, ModuleOverrides, OVERRIDES_FILE};
pub use repository::RepositoryRecord;
