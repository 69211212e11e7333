//! Record type and record operation tests.
//!
//! Covers record creation through types and the registry, per-property
//! validation, raising versus collecting, and schema-driven perfecting.

use serde_json::json;

use crate::common::{builders::CustomerBuilder, findings, fixtures::customer_type};
use crate::{assert_error_message_contains, assert_error_variant, assert_no_violations};

use record_shape::{
    Error, Record, TypeRegistry, ViolationKind, create_type, validate_object, validate_property,
};
use std::sync::Arc;

#[test]
fn test_records_share_their_type_schema() {
    let record_type = customer_type();
    let first = record_type.new_record();
    let second = record_type.record_from(CustomerBuilder::new().build_map());
    assert!(Arc::ptr_eq(first.schema().expect("bound"), record_type.schema()));
    assert!(Arc::ptr_eq(second.schema().expect("bound"), record_type.schema()));
    assert_eq!(second.type_name(), Some("Customer"));
}

#[test]
fn test_record_with_enum_miss_and_missing_required() {
    let record = customer_type()
        .record_from_value(CustomerBuilder::new().without_name().with_tier("D").build())
        .expect("mapping");
    let violations = record.violations().expect("record is bound");
    assert_eq!(
        findings(&violations),
        vec![
            ("name", ViolationKind::Required),
            ("tier", ViolationKind::Enum),
        ]
    );
    assert!(violations[1].message.contains("\"D\""));
}

#[test]
fn test_validate_raises_with_every_violation() {
    let record = customer_type()
        .record_from_value(CustomerBuilder::new().without_name().with_zip("1").build())
        .expect("mapping");
    match record.validate() {
        Err(Error::ValidationFailed { violations }) => assert_eq!(violations.len(), 2),
        other => panic!("Expected ValidationFailed, got {:?}", other),
    }
    assert_error_message_contains!(record.validate(), "address.zip");
}

#[test]
fn test_valid_record_validates_in_both_modes() {
    let record = customer_type()
        .record_from_value(CustomerBuilder::new_full().build())
        .expect("mapping");
    assert!(record.validate().is_ok());
    assert_no_violations!(validate_object(&record, false).expect("record is bound"));
    assert_no_violations!(validate_object(&record, true).expect("record is valid"));
}

#[test]
fn test_attributes_outside_the_schema_are_ignored() {
    let record = customer_type()
        .record_from_value(CustomerBuilder::new().with("nickname", json!(42)).build())
        .expect("mapping");
    assert_no_violations!(record.violations().expect("record is bound"));
}

#[test]
fn test_mutation_is_not_checked_until_validation() {
    let mut record = customer_type()
        .record_from_value(CustomerBuilder::new().build())
        .expect("mapping");
    record.set("age", "thirty");
    assert_eq!(record.get("age"), Some(&json!("thirty")));

    let violations = record.violations().expect("record is bound");
    assert_eq!(findings(&violations), vec![("age", ViolationKind::Type)]);

    record.set("age", 30);
    assert_no_violations!(record.violations().expect("record is bound"));
}

#[test]
fn test_validate_single_property() {
    let record = customer_type()
        .record_from_value(CustomerBuilder::new().with_tier("Z").without_name().build())
        .expect("mapping");

    let violations = validate_property("tier", &record, false).expect("tier is defined");
    assert_eq!(findings(&violations), vec![("tier", ViolationKind::Enum)]);

    assert_no_violations!(validate_property("email", &record, true).expect("absent optional"));
    assert_error_variant!(record.validate_property("name"), Error::ValidationFailed { .. });
}

#[test]
fn test_validate_property_argument_errors() {
    let record = customer_type().new_record();
    assert_error_variant!(validate_property("", &record, false), Error::InvalidArgument { .. });
    assert_error_variant!(
        validate_property("nickname", &record, false),
        Error::InvalidArgument { .. }
    );
    assert_error_variant!(
        validate_property("name", &Record::new(), false),
        Error::InvalidArgument { .. }
    );
}

#[test]
fn test_unbound_record_is_an_argument_error() {
    let mut record = Record::new();
    record.set("name", "Ada");
    assert_error_variant!(validate_object(&record, false), Error::InvalidArgument { .. });
    assert_error_variant!(record.validate(), Error::InvalidArgument { .. });
}

#[test]
fn test_perfect_strips_unknown_and_fills_defaults() {
    let mut record = customer_type()
        .record_from_value(json!({"name": "Ada", "tier": null, "nickname": "The Countess"}))
        .expect("mapping");
    record.perfect().expect("record is bound");

    assert!(!record.contains("nickname"));
    assert_eq!(record.get("tier"), Some(&json!("C")));
    assert_eq!(record.get("name"), Some(&json!("Ada")));
    assert_eq!(record.get("email"), Some(&json!(null)));
    assert_eq!(record.get("address"), Some(&json!(null)));
    assert_eq!(record.len(), 8, "every schema property is present after perfecting");
    assert!(record.validate().is_ok());
}

#[test]
fn test_perfect_keeps_present_values() {
    let mut record = customer_type()
        .record_from_value(CustomerBuilder::new().with_tier("B").build())
        .expect("mapping");
    record.perfect().expect("record is bound");
    assert_eq!(record.get("tier"), Some(&json!("B")));
}

#[test]
fn test_registry_creates_records_by_name() {
    let mut registry = TypeRegistry::new();
    assert!(registry.is_empty());
    registry
        .register("Customer", crate::common::fixtures::customer_description())
        .expect("schema is valid");
    registry
        .register("Tag", json!({"label": {"type": "str", "required": true}}))
        .expect("schema is valid");

    assert_eq!(registry.len(), 2);
    assert_eq!(registry.names(), vec!["Customer", "Tag"]);

    let tag = registry.create_record("Tag").expect("Tag is registered");
    assert_eq!(tag.type_name(), Some("Tag"));
    assert_eq!(tag.violations().expect("bound").len(), 1);

    assert_error_variant!(registry.create_record("Invoice"), Error::InvalidArgument { .. });
    assert_error_variant!(registry.register("Tag", json!({})), Error::InvalidArgument { .. });
}

#[test]
fn test_failed_registration_leaves_registry_unchanged() {
    let mut registry = TypeRegistry::new();
    assert_error_variant!(
        registry.register("Broken", json!({"a": {"type": "nope"}})),
        Error::InvalidSchemaDefinition { .. }
    );
    assert!(registry.get("Broken").is_none());
    assert!(registry.register("Broken", json!({})).is_ok());
}

#[test]
fn test_types_from_one_schema_stay_independent() {
    let schema = Arc::clone(customer_type().schema());
    let vip = create_type("Vip", Arc::clone(&schema)).expect("schema is valid");
    let record = vip.new_record();
    assert_eq!(record.type_name(), Some("Vip"));
    assert_eq!(customer_type().name(), "Customer");
    assert!(Arc::ptr_eq(vip.schema(), &schema));
}
