//! Object-level schemas: an ordered mapping from property name to rule.
//!
//! A [`Schema`] is validated as a whole when it is constructed. Once built it
//! is read-only and is normally shared behind an [`Arc`] by a record type and
//! every record it creates.

use super::property::{PropertyRule, decode_rule};
use super::types::{Violation, ViolationKind, nest_path, value_kind_name};
use crate::error::{Error, Result};

use log::{debug, warn};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;

/// An ordered set of named property rules describing one object shape.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    properties: Vec<(String, PropertyRule)>,
}

impl Schema {
    /// Build a schema from `(name, rule)` pairs, keeping their order.
    pub fn new<I, N>(properties: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, PropertyRule)>,
        N: Into<String>,
    {
        let schema = Self {
            properties: properties
                .into_iter()
                .map(|(name, rule)| (name.into(), rule))
                .collect(),
        };
        let violations = schema.validate_definition();
        if violations.is_empty() {
            Ok(schema)
        } else {
            Err(Error::invalid_definition(violations))
        }
    }

    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Build a schema from a description mapping of name to rule description.
    ///
    /// A missing or non-mapping description fails with
    /// [`Error::InvalidArgument`]; malformed content fails with
    /// [`Error::InvalidSchemaDefinition`] carrying every violation.
    pub fn from_description(description: &Value) -> Result<Self> {
        match description {
            Value::Null => Err(Error::invalid_argument(
                "The schema description is required.",
            )),
            Value::Object(_) => {
                let schema = decode_schema(description).map_err(|violations| {
                    warn!(
                        "Rejected schema description with {} violation(s)",
                        violations.len()
                    );
                    Error::invalid_definition(violations)
                })?;
                debug!("Built schema with {} properties", schema.len());
                Ok(schema)
            }
            other => Err(Error::invalid_argument(format!(
                "The schema description must be a mapping, got {}.",
                value_kind_name(other)
            ))),
        }
    }

    /// Report every violation in a schema description without building it.
    pub fn validate_description(description: &Value) -> Vec<Violation> {
        decode_schema(description).err().unwrap_or_default()
    }

    /// Check every member rule and the property names themselves.
    pub fn validate_definition(&self) -> Vec<Violation> {
        let mut violations = Vec::new();
        let mut seen = HashSet::new();
        for (name, rule) in &self.properties {
            if name.is_empty() {
                violations.push(empty_name());
            } else if !seen.insert(name.as_str()) {
                violations.push(Violation::new(
                    name.clone(),
                    ViolationKind::DuplicateName,
                    format!("The property \"{}\" is declared more than once.", name),
                ));
            }
            violations.extend(
                rule.validate_definition()
                    .into_iter()
                    .map(|v| within_property(name, v)),
            );
        }
        violations
    }

    pub fn get(&self, name: &str) -> Option<&PropertyRule> {
        self.properties
            .iter()
            .find(|(property, _)| property == name)
            .map(|(_, rule)| rule)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Property names in declaration order.
    pub fn names(&self) -> Vec<&str> {
        self.properties.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// `(name, rule)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyRule)> {
        self.properties
            .iter()
            .map(|(name, rule)| (name.as_str(), rule))
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

/// Incremental construction of a [`Schema`].
#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    properties: Vec<(String, PropertyRule)>,
}

impl SchemaBuilder {
    pub fn property(mut self, name: impl Into<String>, rule: PropertyRule) -> Self {
        self.properties.push((name.into(), rule));
        self
    }

    pub fn build(self) -> Result<Schema> {
        Schema::new(self.properties)
    }
}

/// Conversion into a shared, validated schema.
///
/// Implemented for description values (which are decoded and checked) and
/// for schemas that already exist (which are wrapped as they are).
pub trait IntoSchema {
    fn into_schema(self) -> Result<Arc<Schema>>;
}

impl IntoSchema for Schema {
    fn into_schema(self) -> Result<Arc<Schema>> {
        Ok(Arc::new(self))
    }
}

impl IntoSchema for Arc<Schema> {
    fn into_schema(self) -> Result<Arc<Schema>> {
        Ok(self)
    }
}

impl IntoSchema for &Arc<Schema> {
    fn into_schema(self) -> Result<Arc<Schema>> {
        Ok(Arc::clone(self))
    }
}

impl IntoSchema for &Value {
    fn into_schema(self) -> Result<Arc<Schema>> {
        Schema::from_description(self).map(Arc::new)
    }
}

impl IntoSchema for Value {
    fn into_schema(self) -> Result<Arc<Schema>> {
        (&self).into_schema()
    }
}

impl TryFrom<&Value> for Schema {
    type Error = Error;

    fn try_from(description: &Value) -> Result<Self> {
        Schema::from_description(description)
    }
}

/// Decode a schema description, collecting violations from every property.
pub(crate) fn decode_schema(description: &Value) -> std::result::Result<Schema, Vec<Violation>> {
    let Some(entries) = description.as_object() else {
        return Err(vec![Violation::new(
            "",
            ViolationKind::InvalidSetting,
            format!(
                "A schema description must be a mapping of property names, got {}.",
                value_kind_name(description)
            ),
        )]);
    };

    let mut violations = Vec::new();
    let mut properties = Vec::with_capacity(entries.len());
    for (name, rule_description) in entries {
        if name.is_empty() {
            violations.push(empty_name());
        }
        match decode_rule(rule_description) {
            Ok(rule) => properties.push((name.clone(), rule)),
            Err(found) => violations.extend(found.into_iter().map(|v| within_property(name, v))),
        }
    }

    if violations.is_empty() {
        Ok(Schema { properties })
    } else {
        Err(violations)
    }
}

/// Path segment standing in for an empty property name.
const EMPTY_NAME_SEGMENT: &str = "[\"\"]";

fn name_segment(name: &str) -> &str {
    if name.is_empty() { EMPTY_NAME_SEGMENT } else { name }
}

fn within_property(name: &str, violation: Violation) -> Violation {
    Violation {
        path: nest_path(name_segment(name), &violation.path),
        ..violation
    }
}

fn empty_name() -> Violation {
    Violation::new(
        EMPTY_NAME_SEGMENT,
        ViolationKind::EmptyName,
        "A property name cannot be empty.",
    )
}
