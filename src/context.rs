// Author: Dustin Pilgrim
// License: MIT

use crate::value::{Map, Value};
use crate::ConfigError;

/// The namespace that attribute expressions are evaluated against and that
/// evaluation results accumulate into.
///
/// One context is owned by one evaluation of one document. It is passed
/// explicitly through every recursive step; nothing about it is global.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EvalContext {
    variables: Map,
}

impl EvalContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn variables(&self) -> &Map {
        &self.variables
    }

    pub fn into_variables(self) -> Map {
        self.variables
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    /// Follows `path` through nested objects, starting at the root.
    pub fn lookup<S: AsRef<str>>(&self, path: &[S]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        let mut current = self.variables.get(first.as_ref())?;
        for seg in rest {
            current = current.get(seg.as_ref())?;
        }
        Some(current)
    }

    /// Seeds a top-level variable before evaluation starts.
    pub fn declare(&mut self, name: impl Into<String>, value: Value) {
        self.variables.insert(name.into(), value);
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Stores `name = value` inside the namespace identified by `namespace`.
    ///
    /// An empty namespace writes a top-level variable. Otherwise every
    /// namespace segment is treated as an object (absent or null entries start
    /// out empty), and the rebuilt objects replace the old ones on the way
    /// back up. A segment that already holds a non-object value is a
    /// structural collision.
    pub fn merge(&mut self, namespace: &[String], name: &str, value: Value) -> Result<(), ConfigError> {
        let Some((head, rest)) = namespace.split_first() else {
            self.variables.insert(name.to_string(), value);
            return Ok(());
        };

        let updated = merged_object(self.variables.get(head), rest, name, value, head.clone())?;
        self.variables.insert(head.clone(), updated);
        Ok(())
    }
}

fn merged_object(
    current: Option<&Value>,
    rest: &[String],
    name: &str,
    value: Value,
    scope: String,
) -> Result<Value, ConfigError> {
    let mut items = match current {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(items)) => items.clone(),
        Some(other) => {
            return Err(ConfigError::StructuralError {
                message: format!(
                    "Cannot store '{}' under '{}': it already holds a {} value",
                    name,
                    scope,
                    other.type_name()
                ),
                path: scope,
                hint: Some("Rename the attribute or the block so they do not share a key".into()),
                code: Some(605),
            });
        }
    };

    match rest.split_first() {
        None => {
            items.insert(name.to_string(), value);
        }
        Some((head, tail)) => {
            let child_scope = format!("{}.{}", scope, head);
            let child = merged_object(items.get(head), tail, name, value, child_scope)?;
            items.insert(head.clone(), child);
        }
    }

    Ok(Value::Object(items))
}

/// Dotted path of an attribute inside a namespace, e.g. `jane_doe.birthday`.
pub(crate) fn join_path(namespace: &[String], name: &str) -> String {
    let mut segments: Vec<&str> = namespace.iter().map(String::as_str).collect();
    if !name.is_empty() {
        segments.push(name);
    }
    segments.join(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ns(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_merge_root_sets_variable() {
        let mut ctx = EvalContext::new();
        ctx.merge(&[], "version", Value::Number(1.0)).unwrap();
        assert_eq!(ctx.get("version"), Some(&Value::Number(1.0)));
    }

    #[test]
    fn test_merge_accumulates_into_one_object() {
        let mut ctx = EvalContext::new();
        ctx.merge(&ns(&["jane_doe"]), "date", "2020-01-01".into()).unwrap();
        ctx.merge(&ns(&["jane_doe"]), "birthday", "1990-01-01".into()).unwrap();
        ctx.merge(&ns(&["jane_doe"]), "date", "2021-01-01".into()).unwrap();

        let person = ctx.get("jane_doe").and_then(Value::as_object).unwrap();
        assert_eq!(person.len(), 2);
        assert_eq!(person.get("date"), Some(&Value::from("2021-01-01")));
        let keys: Vec<&String> = person.keys().collect();
        assert_eq!(keys, vec!["date", "birthday"]);
    }

    #[test]
    fn test_merge_nested_namespace_and_null_slot() {
        let mut ctx = EvalContext::new();
        ctx.declare("outer", Value::Null);
        ctx.merge(&ns(&["outer", "inner"]), "x", Value::Bool(true)).unwrap();
        assert_eq!(ctx.lookup(&["outer", "inner", "x"]), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_merge_into_scalar_is_structural() {
        let mut ctx = EvalContext::new();
        ctx.declare("local", Value::Number(3.0));
        let err = ctx.merge(&ns(&["local"]), "x", Value::Null).unwrap_err();
        assert!(err.is_structural());
        assert_eq!(err.code(), Some(605));
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path(&ns(&["jane_doe"]), "birthday"), "jane_doe.birthday");
        assert_eq!(join_path(&[], "version"), "version");
        assert_eq!(join_path(&ns(&["a", "b"]), ""), "a.b");
    }
}
