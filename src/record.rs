//! Named-attribute records.
//!
//! A [`Record`] stores property values by name and, when it was created by a
//! [`RecordType`](crate::factory::RecordType), holds a shared reference to the
//! schema it must satisfy. Records are not checked on mutation; call
//! [`Record::validate`] when the data should be checked.
//!
//! The explicit methods on [`Record`] are the only way to read or write
//! attributes.

use crate::error::{Error, Result};
use crate::schema::{Schema, Violation, validate_object, validate_property};

use log::debug;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Attribute storage for one instance, optionally bound to a schema.
#[derive(Debug, Clone, Default)]
pub struct Record {
    type_name: Option<String>,
    schema: Option<Arc<Schema>>,
    attributes: Map<String, Value>,
}

impl Record {
    /// Create an empty record that is not bound to any schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an unbound record holding `attributes`.
    pub fn from_attributes(attributes: Map<String, Value>) -> Self {
        Self {
            attributes,
            ..Self::default()
        }
    }

    pub(crate) fn bound(
        type_name: &str,
        schema: Arc<Schema>,
        attributes: Map<String, Value>,
    ) -> Self {
        Self {
            type_name: Some(type_name.to_string()),
            schema: Some(schema),
            attributes,
        }
    }

    /// Name of the record type that created this record.
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    /// The schema this record is bound to.
    pub fn schema(&self) -> Option<&Arc<Schema>> {
        self.schema.as_ref()
    }

    pub fn is_bound(&self) -> bool {
        self.schema.is_some()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Get an attribute, falling back to `default` when it is not set.
    pub fn get_or<'a>(&'a self, name: &str, default: &'a Value) -> &'a Value {
        self.attributes.get(name).unwrap_or(default)
    }

    /// Set an attribute, returning the previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.attributes.insert(name.into(), value.into())
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.attributes.shift_remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.attributes
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Validate every property, failing with [`Error::ValidationFailed`] on
    /// any violation.
    pub fn validate(&self) -> Result<()> {
        validate_object(self, true).map(|_| ())
    }

    /// Collect every violation without failing on them.
    pub fn violations(&self) -> Result<Vec<Violation>> {
        validate_object(self, false)
    }

    /// Validate a single property, failing on any violation.
    pub fn validate_property(&self, name: &str) -> Result<()> {
        validate_property(name, self, true).map(|_| ())
    }

    /// Bring the attributes in line with the schema's declared properties.
    ///
    /// Attributes the schema does not define are removed. Properties that are
    /// absent or `null` take the rule's default when one is declared, and
    /// absent properties without a default are set to `null`. Present values
    /// are never replaced. This is an explicit operation; validation never
    /// calls it.
    pub fn perfect(&mut self) -> Result<()> {
        let schema = self.schema.clone().ok_or_else(|| {
            Error::invalid_argument("Perfecting requires a record bound to a schema.")
        })?;

        let before = self.attributes.len();
        self.attributes.retain(|name, _| schema.contains(name));
        let removed = before - self.attributes.len();

        let mut filled = 0;
        for (name, rule) in schema.iter() {
            if !self.attributes.get(name).is_none_or(Value::is_null) {
                continue;
            }
            match rule.default_value() {
                Some(default) => {
                    self.attributes.insert(name.to_string(), default.clone());
                    filled += 1;
                }
                None if !self.attributes.contains_key(name) => {
                    self.attributes.insert(name.to_string(), Value::Null);
                }
                None => {}
            }
        }

        debug!(
            "Perfected record of type '{}': removed {} attribute(s), filled {} default(s)",
            self.type_name().unwrap_or("<anonymous>"),
            removed,
            filled
        );
        Ok(())
    }
}
