use std::sync::Arc;

use invocation_logger::{configure, empty, Level, ScrubHook, StdoutSink};
use serde_json::{json, Map, Value};

fn redact(mut fields: Map<String, Value>) -> Map<String, Value> {
    for key in ["email", "email_address", "first_name"] {
        if fields.contains_key(key) {
            fields.insert(key.to_string(), json!("[redacted]"));
        }
    }
    for value in fields.values_mut() {
        if let Value::Object(nested) = value {
            *nested = redact(std::mem::take(nested));
        }
    }
    fields
}

fn main() {
    configure(StdoutSink);

    let hook: ScrubHook = Arc::new(redact);
    let logger = empty(Some(hook));

    // Scrubbed as the layer is derived.
    logger
        .with_data([("customer", json!({"id": 123, "email": "me@example.com"}))])
        .info("loaded customer");

    // Scrubbed again on the merged record, call-site extras included.
    logger
        .at(Level::Info)
        .extra([("first_name", json!("martin")), ("plan", json!("pro"))])
        .emit("upgraded plan");
}
