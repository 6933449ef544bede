// Author: Dustin Pilgrim
// License: MIT

use std::path::Path;

use tracing::debug;

use crate::context::EvalContext;
use crate::document::Body;
use crate::eval::Evaluator;
use crate::schema::SchemaRegistry;
use crate::utils;
use crate::{ConfigError, Value};

mod access;
mod validation;
mod conversion;
mod helpers;

/// An evaluated configuration document with typed, dotted-path access.
pub struct Configuration {
    tree: EvalContext,
    raw_content: String, // Store for error reporting
}

impl Configuration {
    /// Load and evaluate a document with the builtin schemas.
    ///
    /// # Example
    /// ```ignore
    /// let config = Configuration::from_file("~/.config/family.json")?;
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::from_file_with_schemas(path, SchemaRegistry::builtin())
    }

    pub fn from_file_with_schemas<P: AsRef<Path>>(path: P, registry: &SchemaRegistry) -> Result<Self, ConfigError> {
        let content = utils::read_source(&path)?;
        debug!(path = %path.as_ref().display(), "loaded configuration source");
        Self::from_str_with_schemas(&content, registry)
    }

    /// Load a config file with fallback support
    ///
    /// Tries to load from the primary path first. If that fails (file not found),
    /// attempts to load from the fallback path.
    pub fn from_file_with_fallback<P: AsRef<Path>>(primary: P, fallback: P) -> Result<Self, ConfigError> {
        match Self::from_file(&primary) {
            Ok(config) => Ok(config),
            Err(ConfigError::FileError { .. }) => {
                Self::from_file(&fallback).map_err(|e| match e {
                    ConfigError::FileError { message, .. } => ConfigError::FileError {
                        message: format!(
                            "Failed to load config from primary path '{}' or fallback path '{}': {}",
                            primary.as_ref().display(),
                            fallback.as_ref().display(),
                            message
                        ),
                        path: format!(
                            "{} (fallback: {})",
                            primary.as_ref().display(),
                            fallback.as_ref().display()
                        ),
                        hint: Some("Check that at least one of the config files exists".into()),
                        code: Some(301),
                    },
                    other => other,
                })
            }
            Err(other) => Err(other), // Pass through non-file errors
        }
    }

    /// Evaluate a document held in memory with the builtin schemas.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Self::from_str_with_schemas(content, SchemaRegistry::builtin())
    }

    pub fn from_str_with_schemas(content: &str, registry: &SchemaRegistry) -> Result<Self, ConfigError> {
        let body = Body::parse(content)?;
        let tree = Evaluator::new(registry).build(&body)?;
        Ok(Self {
            tree,
            raw_content: content.to_string(),
        })
    }

    /// The evaluated tree.
    pub fn tree(&self) -> &EvalContext {
        &self.tree
    }

    pub fn into_tree(self) -> EvalContext {
        self.tree
    }

    /// The whole tree as one object value.
    pub fn root(&self) -> Value {
        Value::Object(self.tree.variables().clone())
    }
}
