//! Schema definitions and the validation engine.
//!
//! This module provides the property rule model, the object-level schema and
//! the recursive validator that checks values against them.
//!
//! # Key Types
//!
//! - [`PropertyRule`] - Constraint set for a single property
//! - [`Schema`] - Ordered mapping of property names to rules
//! - [`Violation`] - One structured validation finding
//!
//! # Examples
//!
//! ```rust
//! use record_shape::schema::{Schema, validate_attributes};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let schema = Schema::from_description(&json!({
//!     "name": {"type": "string", "required": true},
//!     "age": {"type": "integer", "min": 0}
//! }))?;
//!
//! let attributes = json!({"age": -1});
//! let violations = validate_attributes(attributes.as_object().unwrap(), &schema);
//! assert_eq!(violations.len(), 2);
//! # Ok(())
//! # }
//! ```

pub mod definition;
pub mod property;
pub mod types;
pub mod validation;


// Re-export the main types for convenience
pub use definition::{IntoSchema, Schema, SchemaBuilder};
pub use property::{PropertyRule, PropertyRuleBuilder, validate_rule_description};
pub use types::{PropertyKind, Temporal, Violation, ViolationKind};
pub use validation::{
    validate_attributes, validate_object, validate_property, validate_standalone, validate_value,
};
