// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Strict `$name` template substitution.
//!
//! Placeholders are `$name` or `${name}`, where a name starts with an ASCII
//! letter or underscore followed by letters, digits, or underscores. `$$`
//! renders a literal `$`. Rendering fails on any placeholder without a
//! substitution and on any substitution the template does not use.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use quill_core::QuillError;
use regex::Regex;

/// One parsed piece of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// A parsed template, validated once and rendered many times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    name: String,
    segments: Vec<Segment>,
    placeholders: BTreeSet<String>,
}

impl Template {
    /// Parses `source`, rejecting malformed placeholders. `name` is used in
    /// error messages only.
    pub fn parse(name: impl Into<String>, source: &str) -> Result<Self, QuillError> {
        let name = name.into();
        let segments = parse_segments(&name, source)?;
        let placeholders = segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Placeholder(key) => Some(key.clone()),
                Segment::Literal(_) => None,
            })
            .collect();
        Ok(Self {
            name,
            segments,
            placeholders,
        })
    }

    /// Template name used in diagnostics.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Distinct placeholder names referenced by the template.
    pub fn placeholders(&self) -> &BTreeSet<String> {
        &self.placeholders
    }

    /// Substitutes every placeholder.
    ///
    /// Both directions are strict: a placeholder missing from `vars` and a
    /// key in `vars` the template never references are template errors.
    pub fn render(&self, vars: &BTreeMap<&str, &str>) -> Result<String, QuillError> {
        let missing: Vec<&str> = self
            .placeholders
            .iter()
            .map(String::as_str)
            .filter(|key| !vars.contains_key(key))
            .collect();
        if !missing.is_empty() {
            return Err(QuillError::Template(format!(
                "template `{}` has no substitution for: {}",
                self.name,
                missing.join(", ")
            )));
        }

        let unused: Vec<&str> = vars
            .keys()
            .copied()
            .filter(|key| !self.placeholders.contains(*key))
            .collect();
        if !unused.is_empty() {
            return Err(QuillError::Template(format!(
                "template `{}` does not reference: {}",
                self.name,
                unused.join(", ")
            )));
        }

        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(key) => {
                    // Presence checked above.
                    if let Some(value) = vars.get(key.as_str()) {
                        out.push_str(value);
                    }
                }
            }
        }
        Ok(out)
    }
}

/// Parses and renders in one call.
pub fn render(template: &str, vars: &BTreeMap<&str, &str>) -> Result<String, QuillError> {
    Template::parse("<inline>", template)?.render(vars)
}

/// `$$`, `$name` or `${name}`. The empty `invalid` alternative matches any
/// other `$`, so every dollar sign is accounted for.
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\$(?:(?P<escaped>\$)|(?P<named>[_A-Za-z][_A-Za-z0-9]*)|\{(?P<braced>[_A-Za-z][_A-Za-z0-9]*)\}|(?P<invalid>))",
    )
    .expect("placeholder pattern compiles")
});

fn parse_segments(name: &str, source: &str) -> Result<Vec<Segment>, QuillError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut last = 0;

    for caps in PLACEHOLDER.captures_iter(source) {
        let Some(whole) = caps.get(0) else { continue };
        literal.push_str(&source[last..whole.start()]);
        last = whole.end();

        if caps.name("escaped").is_some() {
            literal.push('$');
            continue;
        }
        match caps.name("named").or_else(|| caps.name("braced")) {
            Some(key) => {
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Placeholder(key.as_str().to_string()));
            }
            None => return Err(invalid_placeholder(name, source, whole.start())),
        }
    }

    literal.push_str(&source[last..]);
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}

/// Describes the `$` at `offset` that matched none of the valid forms.
fn invalid_placeholder(name: &str, source: &str, offset: usize) -> QuillError {
    let detail = match source[offset + 1..].strip_prefix('{') {
        Some(inner) => match inner.split_once('}') {
            Some((key, _)) => format!("invalid placeholder name `{key}`"),
            None => "unterminated `${`".to_string(),
        },
        None => "`$` must start a placeholder or be doubled".to_string(),
    };
    QuillError::Template(format!(
        "template `{name}` is malformed at byte {offset}: {detail}"
    ))
}
