//! # Basic Usage
//!
//! Declares a schema, mints a record type from it, and validates a record in
//! both collecting and raising modes. Run with `RUST_LOG=debug` to see the
//! library's own log output.

use record_shape::{Error, TypeRegistry};
use serde_json::json;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let mut registry = TypeRegistry::new();
    registry.register(
        "Customer",
        json!({
            "name": {"type": "str", "required": true},
            "tier": {"type": "str", "enum": ["A", "B", "C"], "default": "C"},
            "email": {"type": "str", "regex": "^[^@]+@[^@]+$"},
            "address": {
                "type": "dict",
                "schema": {
                    "street": {"type": "str", "required": true},
                    "zip": {"type": "str", "regex": "^[0-9]{5}$"}
                }
            },
            "orders": {
                "type": "list",
                "member_type": "dict",
                "schema": {
                    "sku": {"type": "str", "required": true},
                    "qty": {"type": "int", "min": 1}
                }
            }
        }),
    )?;
    log::info!("Registered types: {:?}", registry.names());

    let mut customer = registry.create_record("Customer")?;
    customer.set("tier", "D");
    customer.set("address", json!({"zip": "ABCDE"}));
    customer.set("orders", json!([{"sku": "A-1", "qty": 2}, {"sku": "B-2", "qty": 0}]));
    customer.set("nickname", "not in the schema");

    log::info!("Collecting violations...");
    for violation in customer.violations()? {
        log::info!("  [{:?}] {}", violation.kind, violation);
    }

    match customer.validate() {
        Err(Error::ValidationFailed { violations }) => {
            log::info!("Raising mode failed with {} violation(s)", violations.len());
        }
        Err(other) => return Err(other.into()),
        Ok(()) => log::info!("Record is valid"),
    }

    customer.set("name", "Ada Lovelace");
    customer.remove("tier");
    customer.set("address", json!({"street": "12 St James's Sq", "zip": "10001"}));
    customer.set("orders", json!([{"sku": "A-1", "qty": 2}]));
    customer.perfect()?;
    customer.validate()?;

    log::info!("Repaired record: {}", serde_json::to_string(customer.attributes())?);
    Ok(())
}
