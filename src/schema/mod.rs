// Author: Dustin Pilgrim
// License: MIT

use std::collections::HashSet;
use std::path::Path;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::utils;
use crate::ConfigError;

/// An attribute a body may (or must) carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeSchema {
    pub name: String,
    #[serde(default)]
    pub required: bool,
}

/// How a label is turned into a namespace key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelNormalizer {
    /// Lowercase, then replace spaces with underscores. Nothing else changes.
    #[default]
    SnakeCase,
    Verbatim,
}

impl LabelNormalizer {
    pub fn apply(&self, label: &str) -> String {
        match self {
            LabelNormalizer::SnakeCase => label.to_lowercase().replace(' ', "_"),
            LabelNormalizer::Verbatim => label.to_string(),
        }
    }
}

/// The declared kinds of nested block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    /// Namespaced under its type name.
    Generic,
    /// Carries exactly one label and is namespaced under the normalized label.
    Labeled { label: String, normalizer: LabelNormalizer },
}

/// A nested block type accepted by a body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawBlockHeader", into = "RawBlockHeader")]
pub struct BlockHeaderSchema {
    pub block_type: String,
    pub kind: BlockKind,
}

#[derive(Serialize, Deserialize)]
struct RawBlockHeader {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(default)]
    normalizer: LabelNormalizer,
}

impl From<RawBlockHeader> for BlockHeaderSchema {
    fn from(raw: RawBlockHeader) -> Self {
        let kind = match raw.label {
            Some(label) => BlockKind::Labeled { label, normalizer: raw.normalizer },
            None => BlockKind::Generic,
        };
        Self { block_type: raw.block_type, kind }
    }
}

impl From<BlockHeaderSchema> for RawBlockHeader {
    fn from(header: BlockHeaderSchema) -> Self {
        match header.kind {
            BlockKind::Generic => RawBlockHeader {
                block_type: header.block_type,
                label: None,
                normalizer: LabelNormalizer::default(),
            },
            BlockKind::Labeled { label, normalizer } => RawBlockHeader {
                block_type: header.block_type,
                label: Some(label),
                normalizer,
            },
        }
    }
}

impl BlockHeaderSchema {
    pub fn generic(block_type: impl Into<String>) -> Self {
        Self { block_type: block_type.into(), kind: BlockKind::Generic }
    }

    pub fn labeled(block_type: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            block_type: block_type.into(),
            kind: BlockKind::Labeled { label: label.into(), normalizer: LabelNormalizer::SnakeCase },
        }
    }

    pub fn label_count(&self) -> usize {
        match self.kind {
            BlockKind::Generic => 0,
            BlockKind::Labeled { .. } => 1,
        }
    }

    pub fn label_name(&self) -> Option<&str> {
        match &self.kind {
            BlockKind::Generic => None,
            BlockKind::Labeled { label, .. } => Some(label),
        }
    }

    /// Key under which a block of this kind is stored in its parent namespace.
    /// `None` when the labels do not match the declared kind.
    pub fn namespace_key(&self, labels: &[String]) -> Option<String> {
        match (&self.kind, labels) {
            (BlockKind::Generic, []) => Some(self.block_type.clone()),
            (BlockKind::Labeled { normalizer, .. }, [label]) => Some(normalizer.apply(label)),
            _ => None,
        }
    }
}

/// The attributes and nested blocks a body of one block type may contain.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BodySchema {
    #[serde(default)]
    pub attributes: Vec<AttributeSchema>,
    #[serde(default)]
    pub blocks: Vec<BlockHeaderSchema>,
}

impl BodySchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn optional(mut self, name: impl Into<String>) -> Self {
        self.attributes.push(AttributeSchema { name: name.into(), required: false });
        self
    }

    pub fn required(mut self, name: impl Into<String>) -> Self {
        self.attributes.push(AttributeSchema { name: name.into(), required: true });
        self
    }

    pub fn block(mut self, block_type: impl Into<String>) -> Self {
        self.blocks.push(BlockHeaderSchema::generic(block_type));
        self
    }

    pub fn labeled_block(mut self, block_type: impl Into<String>, label: impl Into<String>) -> Self {
        self.blocks.push(BlockHeaderSchema::labeled(block_type, label));
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeSchema> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn block_header(&self, block_type: &str) -> Option<&BlockHeaderSchema> {
        self.blocks.iter().find(|b| b.block_type == block_type)
    }

    pub fn required_attributes(&self) -> impl Iterator<Item = &AttributeSchema> {
        self.attributes.iter().filter(|a| a.required)
    }

    fn validate(&self, type_name: &str) -> Result<(), ConfigError> {
        let shown = if type_name.is_empty() { "<root>" } else { type_name };
        let mut seen = HashSet::new();

        for attr in &self.attributes {
            if !seen.insert(attr.name.as_str()) {
                return Err(ConfigError::SchemaError {
                    message: format!("Attribute '{}' is declared twice in schema '{}'", attr.name, shown),
                    hint: None,
                    code: Some(802),
                });
            }
        }

        for header in &self.blocks {
            if !seen.insert(header.block_type.as_str()) {
                return Err(ConfigError::SchemaError {
                    message: format!(
                        "'{}' is declared more than once (as attribute or block) in schema '{}'",
                        header.block_type, shown
                    ),
                    hint: Some("Attribute and block names share one namespace per body".into()),
                    code: Some(803),
                });
            }
            if let BlockKind::Labeled { label, .. } = &header.kind {
                if label.trim().is_empty() {
                    return Err(ConfigError::SchemaError {
                        message: format!("Block '{}' in schema '{}' has an empty label name", header.block_type, shown),
                        hint: Some("Name the label, e.g. \"label\": \"name\"".into()),
                        code: Some(804),
                    });
                }
            }
        }

        Ok(())
    }
}

/// Block type name to body schema. The root body uses the empty name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaRegistry {
    schemas: IndexMap<String, BodySchema>,
}

static BUILTIN: Lazy<SchemaRegistry> = Lazy::new(|| {
    SchemaRegistry::new()
        .with_schema(
            "",
            BodySchema::new()
                .optional("version")
                .block("local")
                .labeled_block("person", "name"),
        )
        .with_schema("person", BodySchema::new().required("date").required("birthday"))
});

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide default table.
    pub fn builtin() -> &'static SchemaRegistry {
        &BUILTIN
    }

    pub fn with_schema(mut self, type_name: impl Into<String>, schema: BodySchema) -> Self {
        self.insert(type_name, schema);
        self
    }

    pub fn insert(&mut self, type_name: impl Into<String>, schema: BodySchema) {
        self.schemas.insert(type_name.into(), schema);
    }

    /// `None` means the block type is unconstrained.
    pub fn lookup(&self, type_name: &str) -> Option<&BodySchema> {
        self.schemas.get(type_name)
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, schema) in &self.schemas {
            schema.validate(name)?;
        }
        Ok(())
    }

    /// Load a registry from its JSON form:
    ///
    /// ```json
    /// {
    ///   "": { "attributes": [{ "name": "version" }],
    ///         "blocks": [{ "type": "person", "label": "name" }] },
    ///   "person": { "attributes": [{ "name": "birthday", "required": true }] }
    /// }
    /// ```
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let registry: SchemaRegistry = serde_json::from_str(content).map_err(|e| ConfigError::SchemaError {
            message: format!("Invalid schema definition at {}:{}: {}", e.line(), e.column(), e),
            hint: Some("A schema file maps block type names to {\"attributes\": [...], \"blocks\": [...]}".into()),
            code: Some(801),
        })?;
        registry.validate()?;
        Ok(registry)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = utils::read_source(path)?;
        Self::from_json(&content)
    }
}
