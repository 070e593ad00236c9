//! Placeholder substitution over rule templates
//!
//! A placeholder is an upper-snake-case name between `#` marks, such as
//! `#LIB_NAME#`. Every placeholder in a template must receive a field when
//! rendering. A field may be marked absent, which drops each line that
//! mentions it.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("Template '{template}' has no value for placeholder #{field}#")]
    MissingField { template: String, field: String },
}

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"#([A-Z][A-Z0-9_]*)#").expect("Invalid placeholder regex"))
}

/// Named values for one rendering
#[derive(Debug, Clone, Default)]
pub struct Fields {
    values: BTreeMap<String, Option<String>>,
}

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, name: &str, value: impl Into<String>) -> Self {
        self.values.insert(name.to_string(), Some(value.into()));
        self
    }

    /// Marks `name` absent: lines holding its placeholder are removed
    pub fn absent(mut self, name: &str) -> Self {
        self.values.insert(name.to_string(), None);
        self
    }

    pub fn optional(self, name: &str, value: Option<String>) -> Self {
        match value {
            Some(v) => self.set(name, v),
            None => self.absent(name),
        }
    }

    fn get(&self, name: &str) -> Option<&Option<String>> {
        self.values.get(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    name: String,
    text: String,
}

impl Template {
    pub fn new(name: &str, text: &str) -> Self {
        Self {
            name: name.to_string(),
            text: text.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Placeholder names in order of first appearance
    pub fn placeholders(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for caps in placeholder_regex().captures_iter(&self.text) {
            let name = caps[1].to_string();
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    pub fn render(&self, fields: &Fields) -> Result<String, TemplateError> {
        let re = placeholder_regex();
        let mut out = String::with_capacity(self.text.len());

        'lines: for line in self.text.split_inclusive('\n') {
            let mut rendered = String::with_capacity(line.len());
            let mut last = 0;

            for caps in re.captures_iter(line) {
                let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                    continue;
                };
                match fields.get(name.as_str()) {
                    None => {
                        return Err(TemplateError::MissingField {
                            template: self.name.clone(),
                            field: name.as_str().to_string(),
                        })
                    }
                    Some(None) => continue 'lines,
                    Some(Some(value)) => {
                        rendered.push_str(&line[last..whole.start()]);
                        rendered.push_str(value);
                        last = whole.end();
                    }
                }
            }

            rendered.push_str(&line[last..]);
            out.push_str(&rendered);
        }

        Ok(out)
    }
}
