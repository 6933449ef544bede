// Author: Dustin Pilgrim
// License: MIT

//! Block documents in their JSON form.
//!
//! A body is a JSON object. Whether a key is an attribute or a nested block
//! is decided by the schema of the body being read:
//!
//! ```json
//! {
//!   "version": 1,
//!   "local": { "base": "/srv" },
//!   "person": {
//!     "Jane Doe": { "date": "2020-01-01", "birthday": "1990-01-01" }
//!   }
//! }
//! ```
//!
//! Generic blocks are an object (or an array of objects) under the block
//! type. Labeled blocks nest one more object level whose keys are the labels.

use std::path::Path;

use serde_json::{Map as JsonMap, Value as Json};
use tracing::trace;

use crate::expr::Expression;
use crate::schema::{BlockHeaderSchema, BlockKind, BodySchema};
use crate::utils;
use crate::ConfigError;

/// An unevaluated body.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Body {
    items: JsonMap<String, Json>,
}

/// An attribute and its unevaluated expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub expr: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub block_type: String,
    pub labels: Vec<String>,
    pub body: Body,
}

/// A body split into attributes and blocks according to a schema.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BodyContent {
    pub attributes: Vec<Attribute>,
    pub blocks: Vec<Block>,
}

impl Body {
    /// Parse a document. The top level must be an object.
    pub fn parse(source: &str) -> Result<Self, ConfigError> {
        let value: Json = serde_json::from_str(source).map_err(|e| ConfigError::SyntaxError {
            message: format!("Invalid document: {}", e),
            line: e.line(),
            column: e.column(),
            hint: Some("Documents are JSON objects of attributes and blocks".into()),
            code: Some(220),
        })?;
        Self::from_json(value)
    }

    pub fn from_json(value: Json) -> Result<Self, ConfigError> {
        match value {
            Json::Object(items) => Ok(Self { items }),
            other => Err(ConfigError::SyntaxError {
                message: format!("Document root must be an object, found {}", json_type_name(&other)),
                line: 1,
                column: 1,
                hint: Some("Wrap the document in { ... }".into()),
                code: Some(221),
            }),
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = utils::read_source(path)?;
        Self::parse(&content)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Every entry of the body as an attribute, without validation.
    ///
    /// Object-valued entries stay attribute values; nothing below this body
    /// is treated as a block.
    pub fn just_attributes(&self) -> Vec<Attribute> {
        self.items
            .iter()
            .map(|(name, raw)| Attribute { name: name.clone(), expr: Expression::new(raw.clone()) })
            .collect()
    }

    /// Split the body into attributes and blocks declared by `schema`.
    ///
    /// `scope` names the body in error messages (a dotted namespace path).
    pub fn content(&self, schema: &BodySchema, scope: &str) -> Result<BodyContent, ConfigError> {
        for attr in schema.required_attributes() {
            if !self.items.contains_key(&attr.name) {
                return Err(structural(
                    scope,
                    format!("Missing required argument '{}'", attr.name),
                    format!("The argument \"{}\" is required, but no definition was found", attr.name),
                    601,
                ));
            }
        }

        let mut content = BodyContent::default();
        for (key, raw) in &self.items {
            if schema.attribute(key).is_some() {
                content.attributes.push(Attribute { name: key.clone(), expr: Expression::new(raw.clone()) });
            } else if let Some(header) = schema.block_header(key) {
                decode_blocks(header, raw, scope, &mut content.blocks)?;
            } else {
                return Err(structural(
                    scope,
                    format!("Unsupported argument '{}'", key),
                    format!("An argument or block named \"{}\" is not expected here", key),
                    602,
                ));
            }
        }

        trace!(
            scope = %scope,
            attributes = content.attributes.len(),
            blocks = content.blocks.len(),
            "split body content"
        );
        Ok(content)
    }
}

fn decode_blocks(
    header: &BlockHeaderSchema,
    raw: &Json,
    scope: &str,
    out: &mut Vec<Block>,
) -> Result<(), ConfigError> {
    match raw {
        Json::Array(items) => {
            for item in items {
                decode_block_group(header, item, scope, out)?;
            }
            Ok(())
        }
        other => decode_block_group(header, other, scope, out),
    }
}

fn decode_block_group(
    header: &BlockHeaderSchema,
    raw: &Json,
    scope: &str,
    out: &mut Vec<Block>,
) -> Result<(), ConfigError> {
    let Json::Object(items) = raw else {
        return Err(structural(
            scope,
            format!("Block '{}' must be an object, found {}", header.block_type, json_type_name(raw)),
            format!("Write the block as \"{}\": {{ ... }}", header.block_type),
            603,
        ));
    };

    match &header.kind {
        BlockKind::Generic => {
            out.push(Block {
                block_type: header.block_type.clone(),
                labels: Vec::new(),
                body: Body { items: items.clone() },
            });
        }
        BlockKind::Labeled { label: label_name, .. } => {
            for (label, body) in items {
                let bodies: Vec<&JsonMap<String, Json>> = match body {
                    Json::Object(b) if !label.is_empty() => vec![b],
                    Json::Array(list) if !label.is_empty() => list.iter().filter_map(Json::as_object).collect(),
                    _ => Vec::new(),
                };
                let arity_ok = match body {
                    Json::Array(list) => bodies.len() == list.len(),
                    _ => bodies.len() == 1,
                };
                if !arity_ok {
                    return Err(structural(
                        scope,
                        format!(
                            "Block '{}' requires exactly one '{}' label",
                            header.block_type, label_name
                        ),
                        format!(
                            "Write labeled blocks as \"{}\": {{ \"<{}>\": {{ ... }} }}",
                            header.block_type, label_name
                        ),
                        604,
                    ));
                }
                for b in bodies {
                    out.push(Block {
                        block_type: header.block_type.clone(),
                        labels: vec![label.clone()],
                        body: Body { items: b.clone() },
                    });
                }
            }
        }
    }

    Ok(())
}

fn structural(scope: &str, message: String, hint: String, code: u32) -> ConfigError {
    ConfigError::StructuralError {
        message,
        path: scope.to_string(),
        hint: Some(hint),
        code: Some(code),
    }
}

pub(crate) fn json_type_name(value: &Json) -> &'static str {
    match value {
        Json::Null => "null",
        Json::Bool(_) => "bool",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests;
