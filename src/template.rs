//! # Placeholder Templates
//!
//! A deliberately small template engine: text with `{{name}}` placeholders,
//! parsed once into literal and placeholder segments and rendered against a
//! [`Context`]. There are no loops, conditionals or filters.
//!
//! Every substituted value must match [`is_safe_value`]. Values come from
//! file and directory names in the repository, and a stray `:`, `#`, quote or
//! whitespace would silently corrupt the generated YAML, so rendering refuses
//! them instead of escaping.
//!
//! ```
//! use manifest_pipeline::template::{Context, Template};
//!
//! let template = Template::parse("dev-deploy-{{ name }}:").unwrap();
//! let context = Context::new().with("name", "payments");
//! assert_eq!(template.render(&context).unwrap(), "dev-deploy-payments:");
//! ```

use crate::error::{Error, Result};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

fn safe_value_regex() -> &'static Regex {
    static SAFE: OnceLock<Regex> = OnceLock::new();
    SAFE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9._/-]*$").expect("valid regex"))
}

/// True when `value` can be substituted into a pipeline without quoting.
///
/// Allowed: ASCII letters, digits, `_`, `.`, `-` and `/`, not starting with
/// `.`, `-` or `/`.
pub fn is_safe_value(value: &str) -> bool {
    safe_value_regex().is_match(value)
}

/// Like [`is_safe_value`], but for a single path segment (no `/`).
pub fn is_safe_identifier(value: &str) -> bool {
    !value.contains('/') && is_safe_value(value)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// A parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Parse template text.
    ///
    /// Fails on an unclosed `{{` and on placeholder names that are empty or
    /// not made of lowercase letters, digits and `_`.
    pub fn parse(source: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut rest = source;

        while let Some(start) = rest.find(OPEN) {
            if start > 0 {
                segments.push(Segment::Literal(rest[..start].to_string()));
            }
            let after_open = &rest[start + OPEN.len()..];
            let end = after_open.find(CLOSE).ok_or_else(|| Error::Template {
                message: format!(
                    "Unclosed placeholder at byte {}",
                    source.len() - rest.len() + start
                ),
                variable: None,
            })?;
            let name = after_open[..end].trim();
            if !is_placeholder_name(name) {
                return Err(Error::Template {
                    message: format!("Invalid placeholder name {:?}", name),
                    variable: None,
                });
            }
            segments.push(Segment::Placeholder(name.to_string()));
            rest = &after_open[end + CLOSE.len()..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        Ok(Self { segments })
    }

    /// Substitute every placeholder from `context`.
    pub fn render(&self, context: &Context) -> Result<String> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(name) => {
                    let value = context.get(name).ok_or_else(|| Error::Template {
                        message: "No value supplied for placeholder".to_string(),
                        variable: Some(name.clone()),
                    })?;
                    if !is_safe_value(value) {
                        return Err(Error::Template {
                            message: format!("Refusing to substitute unsafe value {:?}", value),
                            variable: Some(name.clone()),
                        });
                    }
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }
}

fn is_placeholder_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_lowercase() || c == '_')
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// Placeholder values for one render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    values: BTreeMap<String, String>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`Context::insert`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}
