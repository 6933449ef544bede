// Author: Dustin Pilgrim
// License: MIT

#[cfg(test)]
use super::*;
use crate::schema::SchemaRegistry;

fn root_schema() -> &'static BodySchema {
    SchemaRegistry::builtin().lookup("").unwrap()
}

#[test]
fn test_parse_rejects_non_object_root() {
    let err = Body::parse("[1, 2, 3]").unwrap_err();
    assert_eq!(err.code(), Some(221));

    let err = Body::parse("{ \"version\": ").unwrap_err();
    match err {
        ConfigError::SyntaxError { line, code, .. } => {
            assert_eq!(line, 1);
            assert_eq!(code, Some(220));
        }
        other => panic!("Expected SyntaxError, got {:?}", other),
    }
}

#[test]
fn test_content_splits_attributes_and_labeled_blocks() {
    let body = Body::parse(
        r#"{
            "version": 1,
            "person": {
                "Jane Doe": { "date": "2020-01-01", "birthday": "1990-01-01" },
                "John": { "date": "2021-01-01", "birthday": "1991-01-01" }
            },
            "local": { "city": "Oslo" }
        }"#,
    )
    .unwrap();

    let content = body.content(root_schema(), "").expect("valid root");
    let names: Vec<&str> = content.attributes.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["version"]);

    let blocks: Vec<(&str, Vec<String>)> = content
        .blocks
        .iter()
        .map(|b| (b.block_type.as_str(), b.labels.clone()))
        .collect();
    assert_eq!(
        blocks,
        vec![
            ("person", vec!["Jane Doe".to_string()]),
            ("person", vec!["John".to_string()]),
            ("local", vec![]),
        ]
    );
    assert_eq!(content.blocks[0].body.len(), 2);
}

#[test]
fn test_generic_blocks_as_array() {
    let body = Body::parse(r#"{ "local": [ { "a": 1 }, { "b": 2 } ] }"#).unwrap();
    let content = body.content(root_schema(), "").unwrap();
    assert_eq!(content.blocks.len(), 2);
    assert!(content.blocks.iter().all(|b| b.block_type == "local" && b.labels.is_empty()));
}

#[test]
fn test_missing_required_attribute() {
    let person = SchemaRegistry::builtin().lookup("person").unwrap();
    let body = Body::parse(r#"{ "date": "2020-01-01" }"#).unwrap();
    let err = body.content(person, "jane_doe").unwrap_err();
    match err {
        ConfigError::StructuralError { message, path, code, .. } => {
            assert!(message.contains("birthday"));
            assert_eq!(path, "jane_doe");
            assert_eq!(code, Some(601));
        }
        other => panic!("Expected StructuralError, got {:?}", other),
    }
}

#[test]
fn test_unknown_attribute() {
    let body = Body::parse(r#"{ "version": 1, "colour": "red" }"#).unwrap();
    let err = body.content(root_schema(), "").unwrap_err();
    assert_eq!(err.code(), Some(602));
}

#[test]
fn test_wrong_label_arity() {
    // "person" expects { "<name>": { ... } }, so a bare attribute body has no label.
    let body = Body::parse(r#"{ "person": { "date": "2020-01-01" } }"#).unwrap();
    let err = body.content(root_schema(), "").unwrap_err();
    assert!(err.is_structural());
    assert_eq!(err.code(), Some(604));

    let body = Body::parse(r#"{ "person": "Jane" }"#).unwrap();
    assert_eq!(body.content(root_schema(), "").unwrap_err().code(), Some(603));

    let body = Body::parse(r#"{ "person": { "": { "date": "x", "birthday": "y" } } }"#).unwrap();
    assert_eq!(body.content(root_schema(), "").unwrap_err().code(), Some(604));
}

#[test]
fn test_just_attributes_keeps_object_values() {
    let body = Body::parse(r#"{ "a": 1, "nested": { "b": 2 }, "list": [1, 2] }"#).unwrap();
    let attrs = body.just_attributes();
    let names: Vec<&str> = attrs.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["a", "nested", "list"]);
    assert_eq!(attrs[1].expr.raw(), &serde_json::json!({ "b": 2 }));
}

#[test]
fn test_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("family.json");
    std::fs::write(&path, r#"{ "version": 2 }"#).unwrap();

    let body = Body::from_file(&path).unwrap();
    assert_eq!(body.len(), 1);
    assert!(!body.is_empty());
}
