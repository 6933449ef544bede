// Author: Dustin Pilgrim
// License: MIT

use std::fmt::Write;

use crate::context::EvalContext;
use crate::value::Map;

const INDENT: &str = "  ";

/// Render an evaluated tree for humans.
///
/// Objects print as a `key:` header followed by their entries one level
/// deeper; everything else prints as `key = value`.
///
/// ```
/// use blockcfg::{Body, build_configuration_tree, render_tree};
///
/// let body = Body::parse(r#"{
///     "version": 1,
///     "person": { "Jane Doe": { "date": "2020-01-01", "birthday": "1990-01-01" } }
/// }"#).unwrap();
/// let tree = build_configuration_tree(&body).unwrap();
/// assert_eq!(
///     render_tree(&tree),
///     "version = 1\njane_doe:\n  date = \"2020-01-01\"\n  birthday = \"1990-01-01\"\n"
/// );
/// ```
pub fn render_tree(ctx: &EvalContext) -> String {
    let mut out = String::new();
    render_values(ctx.variables(), 0, &mut out);
    out
}

/// Print the rendered tree to stdout.
pub fn print_tree(ctx: &EvalContext) {
    print!("{}", render_tree(ctx));
}

fn render_values(values: &Map, depth: usize, out: &mut String) {
    let indent = INDENT.repeat(depth);
    for (name, value) in values {
        match value.as_object() {
            Some(items) => {
                let _ = writeln!(out, "{}{}:", indent, name);
                render_values(items, depth + 1, out);
            }
            None => {
                let _ = writeln!(out, "{}{} = {}", indent, name, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use serde_json::json;

    #[test]
    fn test_render_nested_tree() {
        let mut ctx = EvalContext::new();
        ctx.declare("version", Value::Number(1.0));
        ctx.declare(
            "jane_doe",
            Value::from(json!({
                "date": "2020-01-01",
                "pets": ["cat", 2, true],
                "address": { "city": "Oslo", "zip": null }
            })),
        );

        let expected = "\
version = 1
jane_doe:
  date = \"2020-01-01\"
  pets = [\"cat\", 2, true]
  address:
    city = \"Oslo\"
    zip = null
";
        assert_eq!(render_tree(&ctx), expected);
    }

    #[test]
    fn test_render_empty_object_prints_header_only() {
        let mut ctx = EvalContext::new();
        ctx.declare("local", Value::Object(Map::new()));
        assert_eq!(render_tree(&ctx), "local:\n");
        assert_eq!(render_tree(&EvalContext::new()), "");
    }
}
