//! Declarative schemas for named-attribute records.
//!
//! Describe the shape of an object once, mint a record type bound to that
//! description, and validate instances against it on demand. Validation
//! accumulates every violation in one pass and reports each with a path
//! such as `address.zip` or `orders[1].qty`.
//!
//! # Core Components
//!
//! - [`Schema`] - Ordered property rules describing one object shape
//! - [`PropertyRule`] - Constraints for a single property
//! - [`RecordType`] - A named type bound to one shared schema
//! - [`Record`] - Attribute storage that records which schema it satisfies
//!
//! # Quick Start
//!
//! ```rust
//! use record_shape::{create_type, Error};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let customer = create_type("Customer", json!({
//!     "name": {"type": "str", "required": true},
//!     "tier": {"type": "str", "enum": ["A", "B", "C"]},
//!     "address": {
//!         "type": "dict",
//!         "schema": {"zip": {"type": "str", "regex": "^[0-9]{5}$"}}
//!     }
//! }))?;
//!
//! let mut record = customer.new_record();
//! record.set("tier", "D");
//! record.set("address", json!({"zip": "ABCDE"}));
//!
//! let violations = record.violations()?;
//! assert_eq!(violations.len(), 3);
//! assert!(matches!(record.validate(), Err(Error::ValidationFailed { .. })));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod factory;
pub mod record;
pub mod schema;

// Re-export commonly used types for convenience
pub use error::{Error, Result};
pub use factory::{RecordType, TypeRegistry, create_type};
pub use record::Record;
pub use schema::{
    IntoSchema, PropertyKind, PropertyRule, Schema, Temporal, Violation, ViolationKind,
    validate_attributes, validate_object, validate_property, validate_standalone, validate_value,
};
