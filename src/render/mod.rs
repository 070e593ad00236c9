//! Rule templates and the Starlark fragments substituted into them

pub mod template;

pub use template::{Fields, Template, TemplateError};

use crate::fs::FileSystem;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

pub const INDENT_1: &str = "    ";
pub const INDENT_2: &str = "        ";

const LIBRARY: &str = include_str!("../../templates/library.template");
const BINARY: &str = include_str!("../../templates/binary.template");
const TEST: &str = include_str!("../../templates/test.template");
const SERVER: &str = include_str!("../../templates/server.template");
const RULES_JVM_EXTERNAL: &str = include_str!("../../templates/rules_jvm_external.template");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    Library,
    Binary,
    Test,
    Server,
    RulesJvmExternal,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 5] = [
        TemplateKind::Library,
        TemplateKind::Binary,
        TemplateKind::Test,
        TemplateKind::Server,
        TemplateKind::RulesJvmExternal,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TemplateKind::Library => "library",
            TemplateKind::Binary => "binary",
            TemplateKind::Test => "test",
            TemplateKind::Server => "server",
            TemplateKind::RulesJvmExternal => "rules_jvm_external",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.template", self.name())
    }

    fn embedded(&self) -> &'static str {
        match self {
            TemplateKind::Library => LIBRARY,
            TemplateKind::Binary => BINARY,
            TemplateKind::Test => TEST,
            TemplateKind::Server => SERVER,
            TemplateKind::RulesJvmExternal => RULES_JVM_EXTERNAL,
        }
    }
}

/// Every template a run may render, loaded once per invocation
#[derive(Debug, Clone)]
pub struct TemplateSet {
    library: Template,
    binary: Template,
    test: Template,
    server: Template,
    rules_jvm_external: Template,
}

impl TemplateSet {
    pub fn embedded() -> Self {
        let embedded = |kind: TemplateKind| Template::new(kind.name(), kind.embedded());
        Self {
            library: embedded(TemplateKind::Library),
            binary: embedded(TemplateKind::Binary),
            test: embedded(TemplateKind::Test),
            server: embedded(TemplateKind::Server),
            rules_jvm_external: embedded(TemplateKind::RulesJvmExternal),
        }
    }

    /// Embedded templates, each replaced by `<dir>/<name>.template` when
    /// that file exists
    pub fn load(fs: &dyn FileSystem, dir: Option<&Path>) -> Result<Self> {
        let mut set = Self::embedded();
        let Some(dir) = dir else {
            return Ok(set);
        };

        for kind in TemplateKind::ALL {
            let path = dir.join(kind.file_name());
            if fs.is_file(&path) {
                let text = fs
                    .read_to_string(&path)
                    .with_context(|| format!("Failed to load template {}", path.display()))?;
                debug!(template = kind.name(), path = %path.display(), "Using template override");
                *set.slot_mut(kind) = Template::new(kind.name(), &text);
            }
        }
        Ok(set)
    }

    pub fn get(&self, kind: TemplateKind) -> &Template {
        match kind {
            TemplateKind::Library => &self.library,
            TemplateKind::Binary => &self.binary,
            TemplateKind::Test => &self.test,
            TemplateKind::Server => &self.server,
            TemplateKind::RulesJvmExternal => &self.rules_jvm_external,
        }
    }

    fn slot_mut(&mut self, kind: TemplateKind) -> &mut Template {
        match kind {
            TemplateKind::Library => &mut self.library,
            TemplateKind::Binary => &mut self.binary,
            TemplateKind::Test => &mut self.test,
            TemplateKind::Server => &mut self.server,
            TemplateKind::RulesJvmExternal => &mut self.rules_jvm_external,
        }
    }
}

impl Default for TemplateSet {
    fn default() -> Self {
        Self::embedded()
    }
}

/// Quoted rule references, one per line, without the final newline
pub fn rule_refs(refs: &[String]) -> String {
    refs.iter()
        .map(|r| format!("{INDENT_2}\"{r}\","))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Resource list body: empty, or a newline followed by quoted paths
pub fn resource_list(files: &[String]) -> String {
    if files.is_empty() {
        return String::new();
    }
    let lines: Vec<String> = files
        .iter()
        .map(|f| format!("{INDENT_2}\"{f}\","))
        .collect();
    format!("\n{}", lines.join("\n"))
}
