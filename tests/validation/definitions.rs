//! Schema definition tests.
//!
//! Malformed descriptions must be rejected with every problem listed, and
//! argument misuse must be reported as an argument error rather than as a
//! definition error.

use serde_json::{Value, json};

use crate::common::findings;
use crate::{assert_error_message_contains, assert_error_variant};

use record_shape::schema::validate_rule_description;
use record_shape::{Error, PropertyKind, PropertyRule, Schema, ViolationKind, create_type};

#[test]
fn test_missing_description_is_an_argument_error() {
    assert_error_variant!(create_type("Thing", Value::Null), Error::InvalidArgument { .. });
    assert_error_variant!(create_type("Thing", json!(42)), Error::InvalidArgument { .. });
    assert_error_variant!(create_type("Thing", json!("name")), Error::InvalidArgument { .. });
}

#[test]
fn test_empty_type_name_is_checked_before_the_description() {
    let result = create_type("", json!({"a": {"type": "nonsense"}}));
    assert_error_variant!(result, Error::InvalidArgument { .. });
    assert_error_message_contains!(create_type("", json!({})), "\"name\"");
}

#[test]
fn test_every_malformed_setting_is_reported() {
    let result = create_type(
        "Thing",
        json!({
            "a": {"type": "decimal"},
            "b": {"required": "always"},
            "c": "not a rule",
            "d": {"type": "int", "min": 10, "max": 1},
            "e": {"type": "str", "cardinality": 2}
        }),
    );
    let violations = match result {
        Err(Error::InvalidSchemaDefinition { violations }) => violations,
        other => panic!("Expected InvalidSchemaDefinition, got {:?}", other),
    };
    assert_eq!(
        findings(&violations),
        vec![
            ("a.type", ViolationKind::InvalidSetting),
            ("b.required", ViolationKind::InvalidSetting),
            ("c", ViolationKind::InvalidSetting),
            ("d.min", ViolationKind::InconsistentSetting),
            ("e.cardinality", ViolationKind::UnknownSetting),
        ]
    );
    assert!(violations.iter().all(|v| v.kind.is_definition()));
}

#[test]
fn test_definition_error_message_lists_findings() {
    let result = Schema::from_description(&json!({"a": {"type": "decimal"}}));
    assert_error_message_contains!(result, "Illegal type declaration: decimal");
}

#[test]
fn test_enumeration_constraints() {
    let empty = validate_rule_description(&json!({"type": "str", "enum": []}));
    assert_eq!(findings(&empty), vec![("enum", ViolationKind::InvalidSetting)]);

    let mixed = validate_rule_description(&json!({"type": "int", "enum": [1, "2", 3]}));
    assert_eq!(findings(&mixed), vec![("enum", ViolationKind::InconsistentSetting)]);

    let nested = validate_rule_description(&json!({"enum": [[1], {"a": 1}]}));
    assert_eq!(nested.len(), 2);
    assert!(nested.iter().all(|v| v.kind == ViolationKind::InvalidSetting));

    let on_object = validate_rule_description(&json!({"type": "dict", "enum": ["a"]}));
    assert_eq!(findings(&on_object), vec![("enum", ViolationKind::InconsistentSetting)]);

    let untyped = validate_rule_description(&json!({"enum": ["a", 1, true]}));
    assert!(untyped.is_empty(), "untyped enums may mix literals: {:?}", untyped);
}

#[test]
fn test_collection_enum_applies_to_members() {
    let ok = validate_rule_description(&json!({
        "type": "set",
        "member_type": "int",
        "enum": [1, 2, 3]
    }));
    assert!(ok.is_empty(), "{:?}", ok);

    let wrong = validate_rule_description(&json!({
        "type": "set",
        "member_type": "int",
        "enum": ["one"]
    }));
    assert_eq!(findings(&wrong), vec![("enum", ViolationKind::InconsistentSetting)]);
}

#[test]
fn test_length_bounds_cannot_be_negative() {
    let violations = validate_rule_description(&json!({"type": "str", "min": -1}));
    assert_eq!(findings(&violations), vec![("min", ViolationKind::InvalidSetting)]);

    let numeric = validate_rule_description(&json!({"type": "int", "min": -1}));
    assert!(numeric.is_empty());
}

#[test]
fn test_member_type_cannot_be_a_collection() {
    let violations = validate_rule_description(&json!({"type": "list", "member_type": "set"}));
    assert_eq!(
        findings(&violations),
        vec![("member_type", ViolationKind::InconsistentSetting)]
    );
}

#[test]
fn test_list_schema_requires_object_members() {
    let violations = validate_rule_description(&json!({
        "type": "list",
        "member_type": "int",
        "schema": {"id": {"type": "int"}}
    }));
    assert_eq!(
        findings(&violations),
        vec![("member_type", ViolationKind::InconsistentSetting)]
    );
}

#[test]
fn test_default_is_checked_against_its_rule() {
    let violations = validate_rule_description(&json!({"type": "int", "min": 0, "default": -5}));
    assert_eq!(findings(&violations), vec![("default", ViolationKind::InvalidSetting)]);

    let wrong_kind = validate_rule_description(&json!({"type": "int", "default": "zero"}));
    assert_eq!(findings(&wrong_kind), vec![("default", ViolationKind::InvalidSetting)]);
}

#[test]
fn test_builder_runs_the_same_checks() {
    let result = PropertyRule::builder(PropertyKind::Boolean).min(1.0).build();
    assert_error_variant!(result, Error::InvalidSchemaDefinition { .. });

    let result = PropertyRule::builder(PropertyKind::Set)
        .member_type(PropertyKind::String)
        .regex("^[a-z]+$")
        .member_max(8.0)
        .build();
    assert!(result.is_ok());
}

#[test]
fn test_schema_builder_rejects_empty_and_duplicate_names() {
    let result = Schema::builder()
        .property("", PropertyRule::unrestricted())
        .property("id", PropertyRule::unrestricted())
        .property("id", PropertyRule::unrestricted())
        .build();
    let violations = match result {
        Err(Error::InvalidSchemaDefinition { violations }) => violations,
        other => panic!("Expected InvalidSchemaDefinition, got {:?}", other),
    };
    assert_eq!(
        findings(&violations),
        vec![
            ("[\"\"]", ViolationKind::EmptyName),
            ("id", ViolationKind::DuplicateName),
        ]
    );
}

#[test]
fn test_temporal_bounds_are_checked_against_the_type() {
    let result = create_type(
        "Event",
        json!({
            "a": {"type": "int", "min": "2020-01-01"},
            "b": {"type": "date", "min": "next tuesday"},
            "c": {"type": "date", "min": "2021-01-01", "max": "2020-01-01"},
            "d": {"type": "date", "min": 0},
            "e": {"type": "time", "min": "08:00:00", "max": "17:30:00"}
        }),
    );
    let violations = match result {
        Err(Error::InvalidSchemaDefinition { violations }) => violations,
        other => panic!("Expected InvalidSchemaDefinition, got {:?}", other),
    };
    assert_eq!(
        findings(&violations),
        vec![
            ("a.min", ViolationKind::InvalidSetting),
            ("b.min", ViolationKind::InvalidSetting),
            ("c.min", ViolationKind::InconsistentSetting),
            ("d.min", ViolationKind::InconsistentSetting),
        ]
    );
}

#[test]
fn test_schema_keeps_declaration_order() {
    let schema = Schema::from_description(&json!({
        "zeta": {},
        "alpha": {},
        "mid": {}
    }))
    .expect("schema should build");
    assert_eq!(schema.names(), vec!["zeta", "alpha", "mid"]);
    assert_eq!(schema.len(), 3);
    assert!(schema.get("alpha").is_some());
    assert!(!schema.contains("omega"));
}

#[test]
fn test_valid_description_has_no_definition_violations() {
    let violations = Schema::validate_description(&crate::common::fixtures::customer_description());
    assert!(violations.is_empty(), "{:?}", violations);
}
