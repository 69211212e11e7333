//! Record types bound to a schema.
//!
//! [`create_type`] mints a named [`RecordType`] that owns a shared reference
//! to one [`Schema`]. Every [`Record`] the type creates carries that same
//! reference, so it can later be validated against exactly that schema.
//! [`TypeRegistry`] keeps created types addressable by name.

use crate::error::{Error, Result};
use crate::record::Record;
use crate::schema::{IntoSchema, Schema};

use log::debug;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// A named record type permanently bound to one schema.
#[derive(Debug, Clone)]
pub struct RecordType {
    name: String,
    schema: Arc<Schema>,
}

/// Create a record type named `name` for the given schema.
///
/// `schema` may be a description mapping, which is decoded and checked, or
/// an existing [`Schema`] / `Arc<Schema>`, which is used as is.
///
/// # Errors
///
/// [`Error::InvalidArgument`] when `name` is empty or the description is
/// `null` or not a mapping; [`Error::InvalidSchemaDefinition`] when the
/// description is malformed.
///
/// # Example
///
/// ```rust
/// use record_shape::create_type;
/// use serde_json::json;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let person = create_type("Person", json!({"name": {"type": "string", "required": true}}))?;
/// let mut record = person.new_record();
/// record.set("name", "Ada");
/// record.validate()?;
/// # Ok(())
/// # }
/// ```
pub fn create_type(name: &str, schema: impl IntoSchema) -> Result<RecordType> {
    if name.is_empty() {
        return Err(Error::invalid_argument(
            "The \"name\" argument is required and cannot be empty.",
        ));
    }
    let schema = schema.into_schema()?;
    debug!(
        "Created record type '{}' with {} properties",
        name,
        schema.len()
    );
    Ok(RecordType {
        name: name.to_string(),
        schema,
    })
}

impl RecordType {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Create an empty record of this type.
    pub fn new_record(&self) -> Record {
        self.record_from(Map::new())
    }

    /// Create a record of this type holding `attributes`.
    ///
    /// The attributes are stored as given; they are checked only when the
    /// record is validated.
    pub fn record_from(&self, attributes: Map<String, Value>) -> Record {
        Record::bound(&self.name, Arc::clone(&self.schema), attributes)
    }

    /// Create a record of this type from a JSON object value.
    pub fn record_from_value(&self, value: Value) -> Result<Record> {
        match value {
            Value::Object(attributes) => Ok(self.record_from(attributes)),
            _ => Err(Error::invalid_argument(format!(
                "Records of type '{}' must be created from a mapping.",
                self.name
            ))),
        }
    }
}

/// Registry of record types, keyed by type name.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: HashMap<String, RecordType>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and register a record type.
    ///
    /// Registering a name that is already taken fails with
    /// [`Error::InvalidArgument`].
    pub fn register(&mut self, name: &str, schema: impl IntoSchema) -> Result<&RecordType> {
        if self.types.contains_key(name) {
            return Err(Error::invalid_argument(format!(
                "A record type named '{}' is already registered.",
                name
            )));
        }
        let record_type = create_type(name, schema)?;
        Ok(self.types.entry(name.to_string()).or_insert(record_type))
    }

    pub fn get(&self, name: &str) -> Option<&RecordType> {
        self.types.get(name)
    }

    /// Registered type names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.types.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Create an empty record of a registered type.
    pub fn create_record(&self, type_name: &str) -> Result<Record> {
        self.get(type_name)
            .map(RecordType::new_record)
            .ok_or_else(|| {
                Error::invalid_argument(format!("Unknown record type '{}'.", type_name))
            })
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
