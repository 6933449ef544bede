// Author: Dustin Pilgrim
// License: MIT

use std::path::Path;

use crate::context::EvalContext;
use crate::document::Body;
use crate::eval::Evaluator;
use crate::schema::SchemaRegistry;
use crate::ConfigError;

/// Export an evaluated tree to pretty-printed JSON.
///
/// Objects keep their key order. Integral numbers are written as integers.
///
/// # Examples
/// ```
/// use blockcfg::{Body, build_configuration_tree, export::export_tree_to_json};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let body = Body::parse(r#"{ "version": 1 }"#)?;
/// let tree = build_configuration_tree(&body)?;
/// let json = export_tree_to_json(&tree)?;
/// assert!(json.contains("\"version\": 1"));
/// # Ok(())
/// # }
/// ```
pub fn export_tree_to_json(ctx: &EvalContext) -> Result<String, ConfigError> {
    let top: serde_json::Map<String, serde_json::Value> = ctx
        .variables()
        .iter()
        .map(|(k, v)| (k.clone(), v.to_json()))
        .collect();

    serde_json::to_string_pretty(&serde_json::Value::Object(top)).map_err(|e| ConfigError::ExportError {
        message: format!("Failed to serialize tree: {}", e),
        hint: None,
        code: Some(500),
    })
}

/// Load, evaluate and export a document file in one call.
///
/// # Errors
/// Returns error if the file can't be read, isn't a valid document, or
/// doesn't evaluate against `registry`.
pub fn export_file<P: AsRef<Path>>(path: P, registry: &SchemaRegistry) -> Result<String, ConfigError> {
    let body = Body::from_file(path)?;
    let tree = Evaluator::new(registry).build(&body)?;
    export_tree_to_json(&tree)
}
