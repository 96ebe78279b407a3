use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::OnceLock,
};

use anyhow::Context;
use log::warn;
use regex::{Captures, Regex};

static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();

fn placeholder_pattern() -> &'static Regex {
    PLACEHOLDER.get_or_init(|| Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").unwrap())
}

/// An HTML file containing `{{ name }}` placeholders.
#[derive(Debug, Clone)]
pub(crate) struct Template {
    pub path: PathBuf,
    source: String,
}

impl Template {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("while loading template {path:?}"))?;
        Ok(Self::from_source(path, source))
    }

    pub fn from_source(path: &Path, source: String) -> Self {
        Self {
            path: path.to_owned(),
            source,
        }
    }

    pub fn has_placeholder(&self, name: &str) -> bool {
        placeholder_pattern()
            .captures_iter(&self.source)
            .any(|caps| &caps[1] == name)
    }

    /// Logs a warning for each of `names` the template never mentions.
    pub fn check_placeholders(&self, names: &[&str]) {
        for name in names {
            if !self.has_placeholder(name) {
                warn!("Template {:?} has no {{{{ {name} }}}} placeholder", self.path);
            }
        }
    }

    /// Replaces every known placeholder in one pass. Values go in literally and
    /// are never scanned for further placeholders; unknown names stay as they are.
    pub fn render(&self, bindings: &HashMap<&str, String>) -> String {
        placeholder_pattern()
            .replace_all(&self.source, |caps: &Captures| match bindings.get(&caps[1]) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }
}

/// HTML-escapes `value` unless `raw` metadata output was requested.
pub(crate) fn metadata_value(value: &str, escape: bool) -> String {
    if escape {
        maud::html! { (value) }.into_string()
    } else {
        value.to_string()
    }
}
