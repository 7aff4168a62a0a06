use serde_json::{Map, Value};

use crate::logger::ContextLogger;
use crate::scrub::ScrubHook;

/// Documented projection of the platform's opaque invocation metadata.
/// Hosted entrypoints fill this from whatever context object their runtime
/// hands them.
#[derive(Debug, Clone)]
pub struct InvocationContext {
    pub request_id: String,
    pub function_name: String,
    pub function_version: String,
}

/// Error type for malformed builder input. Always a caller contract
/// violation, surfaced immediately and never swallowed.
#[derive(thiserror::Error, Debug)]
pub enum ShapeError {
    #[error("event is missing required field `{0}`")]
    MissingField(&'static str),

    #[error("notification events carry exactly one record, got {0}")]
    RecordCount(usize),
}

fn invocation_fields(ctx: &InvocationContext, service: Option<&str>) -> Map<String, Value> {
    let mut function = Map::new();
    function.insert(
        "name".to_string(),
        Value::String(ctx.function_name.clone()),
    );
    function.insert(
        "version".to_string(),
        Value::String(ctx.function_version.clone()),
    );
    if let Some(service) = service {
        function.insert("service".to_string(), Value::String(service.to_string()));
    }

    let mut fields = Map::new();
    fields.insert(
        "request_id".to_string(),
        Value::String(ctx.request_id.clone()),
    );
    fields.insert("function".to_string(), Value::Object(function));
    fields
}

/// Logger seeded with the generic invocation context:
/// `context: {request_id, function: {name, version[, service]}}`.
pub fn invocation(
    ctx: &InvocationContext,
    service: Option<&str>,
    hook: Option<ScrubHook>,
) -> ContextLogger {
    ContextLogger::seeded(invocation_fields(ctx, service), hook)
}

/// Logger for a single-record notification event.
///
/// The event must expose `records` with exactly one entry; this source
/// never batches, so any other cardinality is a [`ShapeError`]. The
/// record's `id`, `type`, `topic` and `subject` land as a `notification`
/// sub-mapping beside the invocation context.
pub fn notification(
    event: &Value,
    ctx: &InvocationContext,
    service: Option<&str>,
    hook: Option<ScrubHook>,
) -> Result<ContextLogger, ShapeError> {
    let records = event
        .get("records")
        .and_then(Value::as_array)
        .ok_or(ShapeError::MissingField("records"))?;
    let record = match records.as_slice() {
        [record] => record,
        other => return Err(ShapeError::RecordCount(other.len())),
    };

    let mut notification = Map::new();
    for key in ["id", "type", "topic", "subject"] {
        let value = record.get(key).ok_or(ShapeError::MissingField(key))?;
        notification.insert(key.to_string(), value.clone());
    }

    let mut fields = invocation_fields(ctx, service);
    fields.insert("notification".to_string(), Value::Object(notification));
    Ok(ContextLogger::seeded(fields, hook))
}

/// Logger for an event-bus event exposing `{source, detail-type, id}`,
/// recorded as `context.event = {source, name, id}`.
pub fn bus_event(
    event: &Value,
    ctx: &InvocationContext,
    service: Option<&str>,
    hook: Option<ScrubHook>,
) -> Result<ContextLogger, ShapeError> {
    let mut bus = Map::new();
    for (key, rename) in [("source", "source"), ("detail-type", "name"), ("id", "id")] {
        let value = event.get(key).ok_or(ShapeError::MissingField(key))?;
        bus.insert(rename.to_string(), value.clone());
    }

    let mut fields = invocation_fields(ctx, service);
    fields.insert("event".to_string(), Value::Object(bus));
    Ok(ContextLogger::seeded(fields, hook))
}

/// Logger with no invocation context, for tests and non-hosted
/// environments.
pub fn empty(hook: Option<ScrubHook>) -> ContextLogger {
    ContextLogger::new(hook)
}
