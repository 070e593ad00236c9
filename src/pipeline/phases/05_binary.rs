//! Appends a `java_binary` rule depending on every library of the tree to
//! the root BUILD

use crate::fs::find_files;
use crate::model::sanitize;
use crate::pipeline::context::PipelineContext;
use crate::pipeline::files::{relative_dir, BUILD};
use crate::render::{rule_refs, Fields, TemplateKind};
use anyhow::Result;
use regex::Regex;
use std::path::PathBuf;
use std::sync::OnceLock;
use tracing::{debug, info, warn};

fn library_name_regex() -> &'static Regex {
    static LIBRARY_NAME: OnceLock<Regex> = OnceLock::new();
    LIBRARY_NAME.get_or_init(|| {
        Regex::new(r#"java_library\(\s*name\s*=\s*"([^"\n]*)","#).expect("Invalid library name regex")
    })
}

/// Name of the first `java_library` rule in a BUILD file
pub fn library_name(build: &str) -> Option<String> {
    library_name_regex()
        .captures(build)
        .map(|caps| caps[1].to_string())
}

/// `:name` for the root package, `//dir:name` otherwise
pub fn library_label(rel_dir: &str, name: &str) -> String {
    if rel_dir.is_empty() {
        format!(":{name}")
    } else {
        format!("//{rel_dir}:{name}")
    }
}

#[derive(Debug, Clone)]
pub struct BinaryResult {
    pub build_file: PathBuf,
    pub name: String,
    pub runtime_deps: Vec<String>,
}

/// Appends the binary rule. `bin_name` defaults to the main class.
pub fn append_binary(
    context: &PipelineContext,
    main_class: &str,
    bin_name: Option<&str>,
) -> Result<Option<BinaryResult>> {
    let fs = context.fs();
    let build_file = context.root.join(BUILD);
    if !fs.is_file(&build_file) {
        warn!(path = %build_file.display(), "Root BUILD not found, run the build pass first");
        return Ok(None);
    }

    let mut runtime_deps = Vec::new();
    for path in find_files(fs, &context.root, |e| e.name == BUILD)? {
        let content = fs.read_to_string(&path)?;
        let Some(name) = library_name(&content) else {
            debug!(build = %path.display(), "No library rule");
            continue;
        };
        let dir = path.parent().unwrap_or(&context.root);
        runtime_deps.push(library_label(&relative_dir(&context.root, dir)?, &name));
    }

    if runtime_deps.is_empty() {
        warn!(root = %context.root.display(), "No library rules found for the binary");
    }

    context.backup().copy_if_exists(fs, &build_file)?;

    let name = sanitize(bin_name.filter(|n| !n.is_empty()).unwrap_or(main_class));
    let fields = Fields::new()
        .set("BIN_NAME", name.as_str())
        .set("MAIN_CLASS", main_class)
        .set("RUNTIME_DEPS", rule_refs(&runtime_deps));
    let rule = context.templates.get(TemplateKind::Binary).render(&fields)?;
    fs.append(&build_file, &format!("\n{rule}"))?;

    info!(
        binary = %name,
        main_class,
        libraries = runtime_deps.len(),
        "Binary rule appended"
    );
    Ok(Some(BinaryResult {
        build_file,
        name,
        runtime_deps,
    }))
}
