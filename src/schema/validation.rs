//! Value validation against property rules and schemas.
//!
//! Every entry point funnels into one recursive primitive that checks a single
//! value against a single rule and appends what it finds to a violation list.
//! Validation never stops at the first finding: a call reports every
//! violation found in one pass, in schema declaration order.

use super::definition::Schema;
use super::property::PropertyRule;
use super::types::{
    PropertyKind, Violation, ViolationKind, child_path, index_path, value_kind_name,
};
use crate::error::{Error, Result};
use crate::record::Record;

use log::{debug, trace};
use regex::Regex;
use serde_json::{Map, Value};
use std::fmt;

/// Validate one value against one rule.
///
/// `value` is `None` when the property was not supplied; JSON `null` is
/// treated the same way. `property_name` is used as the root of every
/// violation path.
pub fn validate_value(
    property_name: &str,
    rule: &PropertyRule,
    value: Option<&Value>,
) -> Vec<Violation> {
    let mut violations = Vec::new();
    check_value(property_name, rule, value, &mut violations);
    violations
}

/// Validate a plain attribute mapping against a schema.
pub fn validate_attributes(attributes: &Map<String, Value>, schema: &Schema) -> Vec<Violation> {
    let mut violations = Vec::new();
    check_attributes("", attributes, schema, &mut violations);
    violations
}

/// Validate every property of a schema-bound record.
///
/// With `raise_on_error` set, any violation turns into
/// [`Error::ValidationFailed`]; otherwise the (possibly empty) list is
/// returned. An unbound record fails with [`Error::InvalidArgument`].
pub fn validate_object(record: &Record, raise_on_error: bool) -> Result<Vec<Violation>> {
    let schema = record.schema().ok_or_else(|| {
        Error::invalid_argument("Validation requires a record bound to a schema.")
    })?;

    debug!(
        "Validating record of type '{}' against {} properties",
        record.type_name().unwrap_or("<anonymous>"),
        schema.len()
    );

    let violations = validate_attributes(record.attributes(), schema);
    finish(violations, raise_on_error)
}

/// Validate a single property of a schema-bound record.
///
/// An empty name, an unbound record, or a name the schema does not define
/// fails with [`Error::InvalidArgument`].
pub fn validate_property(
    property_name: &str,
    record: &Record,
    raise_on_error: bool,
) -> Result<Vec<Violation>> {
    if property_name.is_empty() {
        return Err(Error::invalid_argument(
            "\"property_name\" is required and cannot be empty.",
        ));
    }
    let schema = record.schema().ok_or_else(|| {
        Error::invalid_argument("Validation requires a record bound to a schema.")
    })?;
    let rule = schema.get(property_name).ok_or_else(|| {
        Error::invalid_argument(format!(
            "The property \"{}\" is not defined by the record's schema.",
            property_name
        ))
    })?;

    debug!(
        "Validating property '{}' of record type '{}'",
        property_name,
        record.type_name().unwrap_or("<anonymous>")
    );

    let violations = validate_value(property_name, rule, record.get(property_name));
    finish(violations, raise_on_error)
}

/// Validate a bare value against a rule, reported under the name `value`.
pub fn validate_standalone(
    value: Option<&Value>,
    rule: &PropertyRule,
    raise_on_error: bool,
) -> Result<Vec<Violation>> {
    finish(validate_value("value", rule, value), raise_on_error)
}

fn finish(violations: Vec<Violation>, raise_on_error: bool) -> Result<Vec<Violation>> {
    if !violations.is_empty() {
        debug!("Validation found {} violation(s)", violations.len());
        if raise_on_error {
            return Err(Error::validation_failed(violations));
        }
    }
    Ok(violations)
}

pub(crate) fn check_attributes(
    prefix: &str,
    attributes: &Map<String, Value>,
    schema: &Schema,
    violations: &mut Vec<Violation>,
) {
    for (name, rule) in schema.iter() {
        let path = child_path(prefix, name);
        trace!("Checking property '{}'", path);
        check_value(&path, rule, attributes.get(name), violations);
    }
}

pub(crate) fn check_value(
    path: &str,
    rule: &PropertyRule,
    value: Option<&Value>,
    violations: &mut Vec<Violation>,
) {
    let value = match value {
        Some(value) if !value.is_null() => value,
        _ => {
            if rule.is_required() {
                violations.push(Violation::new(
                    path,
                    ViolationKind::Required,
                    format!("The value for \"{}\" is required.", path),
                ));
            }
            return;
        }
    };

    let kind = rule.kind();
    if !kind.matches(value) {
        violations.push(Violation::new(
            path,
            ViolationKind::Type,
            format!(
                "The value for \"{}\" is not of type \"{}\": {} ({})",
                path,
                kind,
                value,
                value_kind_name(value)
            ),
        ));
        return;
    }

    match value {
        Value::Array(items) if kind.is_collection() => {
            check_collection(path, rule, items, violations)
        }
        _ => check_single(path, rule, value, violations),
    }

    if let Some(nested) = rule.nested_schema() {
        check_nested(path, rule, nested, value, violations);
    }
}

fn check_single(path: &str, rule: &PropertyRule, value: &Value, violations: &mut Vec<Violation>) {
    if let Some(allowed) = rule.enumeration() {
        if !contains_literal(allowed, value) {
            violations.push(Violation::new(
                path,
                ViolationKind::Enum,
                format!(
                    "The value {} for \"{}\" is not in enumeration {}.",
                    value,
                    path,
                    literal_list(allowed)
                ),
            ));
        }
    }

    let kind = rule.kind();
    let measure = if kind.is_numeric() {
        value.as_f64().map(|n| (n, ""))
    } else if kind.is_length_bounded() {
        length_of(value).map(|len| (len as f64, " length"))
    } else {
        None
    };
    if let Some((measure, unit)) = measure {
        check_bounds(
            path,
            &value.to_string(),
            measure,
            unit,
            (rule.min(), ViolationKind::Min),
            (rule.max(), ViolationKind::Max),
            violations,
        );
    }
    if let Some(at) = value.as_str().and_then(|text| kind.parse_temporal(text)) {
        check_bounds(
            path,
            &value.to_string(),
            at,
            "",
            (rule.temporal_min(), ViolationKind::Min),
            (rule.temporal_max(), ViolationKind::Max),
            violations,
        );
    }

    if let (Some(regex), Some(text)) = (rule.regex(), value.as_str()) {
        if !text.is_empty() && !matches_from_start(regex, text) {
            violations.push(Violation::new(
                path,
                ViolationKind::Regex,
                format!(
                    "The value {} for \"{}\" does not match regex: {}",
                    value,
                    path,
                    regex.as_str()
                ),
            ));
        }
    }
}

fn check_collection(
    path: &str,
    rule: &PropertyRule,
    items: &[Value],
    violations: &mut Vec<Violation>,
) {
    check_bounds(
        path,
        &format!("{} items", items.len()),
        items.len() as f64,
        " length",
        (rule.min(), ViolationKind::Min),
        (rule.max(), ViolationKind::Max),
        violations,
    );

    let unique = rule.kind() == PropertyKind::Set;
    for (index, item) in items.iter().enumerate() {
        let item_path = index_path(path, index);

        if unique && contains_literal(&items[..index], item) {
            violations.push(Violation::new(
                item_path.as_str(),
                ViolationKind::Duplicate,
                format!("The value {} in \"{}\" is a duplicate set member.", item, path),
            ));
        }

        if let Some(member_type) = rule.member_type() {
            if !member_type.matches(item) {
                violations.push(Violation::new(
                    item_path.as_str(),
                    ViolationKind::MemberType,
                    format!(
                        "The value {} for \"{}\" is not of type \"{}\".",
                        item, item_path, member_type
                    ),
                ));
                continue;
            }
        }

        check_member(&item_path, rule, item, violations);
    }
}

fn check_member(path: &str, rule: &PropertyRule, item: &Value, violations: &mut Vec<Violation>) {
    if let Some(allowed) = rule.enumeration() {
        if !contains_literal(allowed, item) {
            violations.push(Violation::new(
                path,
                ViolationKind::MemberEnum,
                format!(
                    "The value {} for \"{}\" is not in enumeration {}.",
                    item,
                    path,
                    literal_list(allowed)
                ),
            ));
        }
    }

    let measure = match rule.member_type() {
        Some(PropertyKind::String) => item
            .as_str()
            .map(|s| (s.chars().count() as f64, " length")),
        Some(kind) if kind.is_numeric() => item.as_f64().map(|n| (n, "")),
        _ => None,
    };
    if let Some((measure, unit)) = measure {
        check_bounds(
            path,
            &item.to_string(),
            measure,
            unit,
            (rule.member_min(), ViolationKind::MemberMin),
            (rule.member_max(), ViolationKind::MemberMax),
            violations,
        );
    }

    if rule.member_type() == Some(PropertyKind::String) {
        if let (Some(regex), Some(text)) = (rule.regex(), item.as_str()) {
            if !text.is_empty() && !matches_from_start(regex, text) {
                violations.push(Violation::new(
                    path,
                    ViolationKind::MemberRegex,
                    format!(
                        "The value {} for \"{}\" does not match regex: {}",
                        item,
                        path,
                        regex.as_str()
                    ),
                ));
            }
        }
    }
}

fn check_nested(
    path: &str,
    rule: &PropertyRule,
    nested: &Schema,
    value: &Value,
    violations: &mut Vec<Violation>,
) {
    match value {
        Value::Object(attributes) => {
            trace!("Descending into nested object '{}'", path);
            check_attributes(path, attributes, nested, violations);
        }
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                let item_path = index_path(path, index);
                match item.as_object() {
                    Some(attributes) => {
                        trace!("Descending into nested element '{}'", item_path);
                        check_attributes(&item_path, attributes, nested, violations);
                    }
                    // Already reported by the member type check.
                    None if rule.member_type() == Some(PropertyKind::Object) => {}
                    None => violations.push(Violation::new(
                        item_path.as_str(),
                        ViolationKind::Type,
                        format!(
                            "The value {} for \"{}\" is not of type \"object\".",
                            item, item_path
                        ),
                    )),
                }
            }
        }
        _ => {}
    }
}

fn check_bounds<T: PartialOrd + fmt::Display>(
    path: &str,
    shown: &str,
    measure: T,
    unit: &str,
    (min, min_kind): (Option<T>, ViolationKind),
    (max, max_kind): (Option<T>, ViolationKind),
    violations: &mut Vec<Violation>,
) {
    if let Some(min) = min {
        if measure < min {
            violations.push(Violation::new(
                path,
                min_kind,
                format!(
                    "The value of {} for \"{}\" fails min{} of {}.",
                    shown, path, unit, min
                ),
            ));
        }
    }
    if let Some(max) = max {
        if measure > max {
            violations.push(Violation::new(
                path,
                max_kind,
                format!(
                    "The value of {} for \"{}\" fails max{} of {}.",
                    shown, path, unit, max
                ),
            ));
        }
    }
}

/// A pattern must match at the start of the text, not merely somewhere in it.
fn matches_from_start(regex: &Regex, text: &str) -> bool {
    regex.find(text).is_some_and(|found| found.start() == 0)
}

fn length_of(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        Value::Object(map) => Some(map.len()),
        _ => None,
    }
}

/// Literal equality where numbers compare by value, so `1` equals `1.0`.
///
/// Two integers compare exactly; floats are only involved when either side
/// is one.
fn same_literal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) if x.is_f64() || y.is_f64() => {
            x.as_f64() == y.as_f64()
        }
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x == y,
            _ => x.as_u64() == y.as_u64(),
        },
        _ => a == b,
    }
}

fn contains_literal(values: &[Value], candidate: &Value) -> bool {
    values.iter().any(|v| same_literal(v, candidate))
}

fn literal_list(values: &[Value]) -> String {
    let members: Vec<String> = values.iter().map(Value::to_string).collect();
    format!("[{}]", members.join(", "))
}
