//! Shared fixtures for the integration suites: invocation metadata, event
//! payloads and a recursive PII scrubber of the kind services install as a
//! scrub hook.

use std::sync::Arc;

use invocation_logger::{configure, InvocationContext, MemorySink, ScrubHook};
use serde_json::{json, Map, Value};

/// Field names treated as PII by the reference scrubber.
#[allow(dead_code)]
pub const PII_FIELDS: &[&str] = &[
    "first_name",
    "last_name",
    "surname",
    "middle_name",
    "initial",
    "first_initial",
    "email",
    "email_address",
    "address_line_1",
    "address_line_2",
    "delivery_instructions",
    "full_address",
    "notes",
    "apartment",
    "building",
    "company",
    "country",
    "department",
    "mobilePhone",
    "streetName",
    "streetNumber",
];

#[allow(dead_code)]
fn scrub_value(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(scrub_map(map)),
        Value::Array(items) => Value::Array(items.into_iter().map(scrub_value).collect()),
        other => other,
    }
}

/// Replace the value of any listed key, walking nested objects and arrays.
#[allow(dead_code)]
pub fn scrub_map(fields: Map<String, Value>) -> Map<String, Value> {
    fields
        .into_iter()
        .map(|(key, value)| {
            if PII_FIELDS.contains(&key.as_str()) {
                (key, json!("PII REMOVED"))
            } else {
                (key, scrub_value(value))
            }
        })
        .collect()
}

#[allow(dead_code)]
pub fn pii_hook() -> ScrubHook {
    Arc::new(scrub_map)
}

/// Fresh in-memory sink, installed as the active pipeline.
pub fn configure_memory() -> MemorySink {
    let sink = MemorySink::new();
    configure(sink.clone());
    sink
}

/// Every line the sink holds, parsed back from the wire.
pub fn parsed_lines(sink: &MemorySink) -> Vec<Value> {
    sink.lines()
        .iter()
        .map(|line| serde_json::from_str(line).expect("sink holds valid JSON lines"))
        .collect()
}

#[allow(dead_code)]
pub fn invocation_ctx() -> InvocationContext {
    InvocationContext {
        request_id: "abc123".to_string(),
        function_name: "do-things".to_string(),
        function_version: "0.1.2.3".to_string(),
    }
}

/// Single-record notification event as delivered by the platform.
#[allow(dead_code)]
pub fn notification_event() -> Value {
    json!({
        "records": [{
            "id": "66591d01-0241-5751-bb17-486e5a6dcf91",
            "type": "Notification",
            "topic": "arn:aws:sns:eu-west-1:476912836688:sftp_drop_topic",
            "subject": "Amazon S3 Notification"
        }]
    })
}

/// Scheduled event-bus payload; builders ignore the keys they do not need.
#[allow(dead_code)]
pub fn scheduled_event() -> Value {
    json!({
        "account": "123456789012",
        "region": "us-east-2",
        "detail": {},
        "detail-type": "Scheduled Event",
        "source": "aws.events",
        "time": "2019-03-01T01:23:45Z",
        "id": "cdc73f9d-aea9-11e3-9d5a-835b769c0d9c",
        "resources": ["arn:aws:events:us-east-1:123456789012:rule/my-schedule"]
    })
}
