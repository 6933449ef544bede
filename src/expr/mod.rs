// Author: Dustin Pilgrim
// License: MIT

//! Attribute expressions.
//!
//! An expression is a JSON value. Strings are templates: `${a.b.c}` refers to
//! a value in the evaluation context. A string that is exactly one reference
//! evaluates to the referenced value itself; otherwise each reference is
//! interpolated as text. `$${` writes a literal `${`. `env.NAME` reads an
//! environment variable unless the context defines `env` itself.

use std::env;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value as Json;

use crate::context::EvalContext;
use crate::value::{Map, Value};

static TEMPLATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\$\{|\$\{([^}]*)\}").expect("template pattern is valid"));

static SEGMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[A-Za-z_][A-Za-z0-9_-]*|[0-9]+)$").expect("segment pattern is valid"));

/// Why an expression could not be evaluated against the current context.
#[derive(Debug, Clone, PartialEq)]
pub enum EvalDiagnostic {
    UnknownVariable { name: String },
    UnsupportedAttribute { path: String, name: String },
    IndexOutOfRange { path: String, index: usize },
    NotTraversable { path: String, type_name: &'static str },
    NotInterpolatable { path: String, type_name: &'static str },
    InvalidReference { reference: String },
}

impl EvalDiagnostic {
    pub fn code(&self) -> u32 {
        match self {
            EvalDiagnostic::UnknownVariable { .. } => 701,
            EvalDiagnostic::UnsupportedAttribute { .. } => 702,
            EvalDiagnostic::IndexOutOfRange { .. } => 703,
            EvalDiagnostic::NotTraversable { .. } => 704,
            EvalDiagnostic::NotInterpolatable { .. } => 705,
            EvalDiagnostic::InvalidReference { .. } => 706,
        }
    }

    pub fn hint(&self) -> Option<String> {
        match self {
            EvalDiagnostic::UnknownVariable { name } => {
                Some(format!("Define '{}' somewhere in the document", name))
            }
            EvalDiagnostic::UnsupportedAttribute { path, .. } => {
                Some(format!("Check the attributes defined under '{}'", path))
            }
            EvalDiagnostic::InvalidReference { .. } => {
                Some("References look like ${block.attribute} or ${env.NAME}".into())
            }
            EvalDiagnostic::NotInterpolatable { .. } => {
                Some("Only strings, numbers and booleans can be embedded in text".into())
            }
            _ => None,
        }
    }
}

impl fmt::Display for EvalDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalDiagnostic::UnknownVariable { name } =>
                write!(f, "Unknown variable: there is no variable named '{}'", name),
            EvalDiagnostic::UnsupportedAttribute { path, name } =>
                write!(f, "Unsupported attribute: '{}' has no attribute named '{}'", path, name),
            EvalDiagnostic::IndexOutOfRange { path, index } =>
                write!(f, "Invalid index: '{}' has no element {}", path, index),
            EvalDiagnostic::NotTraversable { path, type_name } =>
                write!(f, "Cannot traverse into '{}': it is a {} value", path, type_name),
            EvalDiagnostic::NotInterpolatable { path, type_name } =>
                write!(f, "Cannot embed '{}' in a string: it is a {} value", path, type_name),
            EvalDiagnostic::InvalidReference { reference } =>
                write!(f, "Invalid reference '${{{}}}'", reference),
        }
    }
}

impl std::error::Error for EvalDiagnostic {}

/// An unevaluated attribute expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    raw: Json,
}

impl Expression {
    pub fn new(raw: Json) -> Self {
        Self { raw }
    }

    pub fn raw(&self) -> &Json {
        &self.raw
    }

    pub fn evaluate(&self, ctx: &EvalContext) -> Result<Value, EvalDiagnostic> {
        evaluate_json(&self.raw, ctx)
    }
}

fn evaluate_json(raw: &Json, ctx: &EvalContext) -> Result<Value, EvalDiagnostic> {
    match raw {
        Json::String(s) => evaluate_template(s, ctx),
        Json::Array(items) => items
            .iter()
            .map(|item| evaluate_json(item, ctx))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Json::Object(items) => {
            let mut out = Map::new();
            for (key, item) in items {
                out.insert(key.clone(), evaluate_json(item, ctx)?);
            }
            Ok(Value::Object(out))
        }
        other => Ok(Value::from(other.clone())),
    }
}

/// Evaluate a string template against `ctx`.
pub fn evaluate_template(s: &str, ctx: &EvalContext) -> Result<Value, EvalDiagnostic> {
    // Fast path: nothing to substitute
    if !s.contains("${") {
        return Ok(Value::String(s.to_string()));
    }

    if let Some(caps) = TEMPLATE_RE.captures(s) {
        let whole = caps.get(0).map(|m| m.start() == 0 && m.end() == s.len()).unwrap_or(false);
        if let (true, Some(reference)) = (whole, caps.get(1)) {
            return resolve_reference(reference.as_str(), ctx);
        }
    }

    let mut out = String::with_capacity(s.len());
    let mut last = 0;
    for caps in TEMPLATE_RE.captures_iter(s) {
        let Some(m) = caps.get(0) else { continue };
        out.push_str(&s[last..m.start()]);
        match caps.get(1) {
            None => out.push_str("${"),
            Some(reference) => {
                let value = resolve_reference(reference.as_str(), ctx)?;
                let text = value.to_template_string().ok_or_else(|| EvalDiagnostic::NotInterpolatable {
                    path: reference.as_str().trim().to_string(),
                    type_name: value.type_name(),
                })?;
                out.push_str(&text);
            }
        }
        last = m.end();
    }
    out.push_str(&s[last..]);

    Ok(Value::String(out))
}

/// Split `a.b.0` into its segments.
pub fn parse_reference(reference: &str) -> Result<Vec<String>, EvalDiagnostic> {
    let trimmed = reference.trim();
    let invalid = || EvalDiagnostic::InvalidReference { reference: trimmed.to_string() };

    let path: Vec<String> = trimmed.split('.').map(str::to_string).collect();
    if path.iter().any(|seg| !SEGMENT_RE.is_match(seg)) {
        return Err(invalid());
    }
    if path.first().map(|first| first.chars().all(|c| c.is_ascii_digit())).unwrap_or(true) {
        return Err(invalid());
    }
    Ok(path)
}

/// Resolve a reference in the current context.
pub fn resolve_reference(reference: &str, ctx: &EvalContext) -> Result<Value, EvalDiagnostic> {
    let path = parse_reference(reference)?;
    let Some((first, rest)) = path.split_first() else {
        return Err(EvalDiagnostic::InvalidReference { reference: reference.trim().to_string() });
    };

    let mut current = match ctx.get(first) {
        Some(value) => value,
        None if first == "env" => return resolve_env(&path),
        None => return Err(EvalDiagnostic::UnknownVariable { name: first.clone() }),
    };

    let mut walked = first.clone();
    for seg in rest {
        current = match current {
            Value::Object(items) => items.get(seg).ok_or_else(|| EvalDiagnostic::UnsupportedAttribute {
                path: walked.clone(),
                name: seg.clone(),
            })?,
            Value::Array(items) => {
                let index: usize = seg.parse().map_err(|_| EvalDiagnostic::NotTraversable {
                    path: walked.clone(),
                    type_name: "array",
                })?;
                items.get(index).ok_or_else(|| EvalDiagnostic::IndexOutOfRange {
                    path: walked.clone(),
                    index,
                })?
            }
            other => {
                return Err(EvalDiagnostic::NotTraversable {
                    path: walked.clone(),
                    type_name: other.type_name(),
                });
            }
        };
        walked.push('.');
        walked.push_str(seg);
    }

    Ok(current.clone())
}

/// `env.NAME` resolver. Unset variables read as an empty string.
fn resolve_env(path: &[String]) -> Result<Value, EvalDiagnostic> {
    match path {
        [_, name] => Ok(Value::String(env::var(name).unwrap_or_default())),
        _ => Err(EvalDiagnostic::InvalidReference { reference: path.join(".") }),
    }
}

#[cfg(test)]
mod tests;
