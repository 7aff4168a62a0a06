use serde_json::{Map, Value};

use crate::record::LogRecord;

/// Render one record as a single-line JSON object.
///
/// Required keys: `msg` and the lower-cased `level` name. `context`, `data`
/// and `type` appear only when the record carries them. A captured error is
/// injected as `data.error`, creating the `data` object when it is absent
/// or not an object. Key order is not part of the wire contract. No
/// timestamp is emitted: the hosting platform stamps ingested lines.
pub fn render(record: LogRecord) -> String {
    let LogRecord {
        level,
        message,
        mut fields,
        error,
    } = record;

    if let Some(captured) = error {
        let value = serde_json::to_value(&captured).unwrap_or(Value::Null);
        let data = fields
            .entry("data")
            .or_insert_with(|| Value::Object(Map::new()));
        if !data.is_object() {
            // A scrub hook may rewrite `data` wholesale; the captured error
            // still has to reach the wire.
            *data = Value::Object(Map::new());
        }
        if let Value::Object(data) = data {
            data.insert("error".to_string(), value);
        }
    }

    fields.insert("msg".to_string(), Value::String(message));
    fields.insert("level".to_string(), Value::String(level.name().to_string()));

    serde_json::to_string(&Value::Object(fields)).unwrap_or_else(|_| {
        "{\"level\":\"error\",\"msg\":\"record serialization failed\"}".to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Level;
    use crate::record::CapturedError;
    use serde_json::json;
    use std::sync::Arc;

    fn record(level: Level, message: &str) -> LogRecord {
        LogRecord {
            level,
            message: message.to_string(),
            fields: Map::new(),
            error: None,
        }
    }

    fn parse(line: &str) -> Value {
        serde_json::from_str(line).expect("rendered line is valid JSON")
    }

    #[test]
    fn minimal_record_has_exactly_msg_and_level() {
        let line = render(record(Level::Info, "Hello world"));
        assert_eq!(parse(&line), json!({"msg": "Hello world", "level": "info"}));
    }

    #[test]
    fn merged_fields_pass_through_at_top_level() {
        let mut rec = record(Level::Warning, "careful");
        rec.fields = json!({
            "context": {"request_id": "abc"},
            "data": {"attempt": 3},
            "type": "retry-scheduled"
        })
        .as_object()
        .cloned()
        .unwrap();

        let parsed = parse(&render(rec));
        assert_eq!(parsed["context"], json!({"request_id": "abc"}));
        assert_eq!(parsed["data"], json!({"attempt": 3}));
        assert_eq!(parsed["type"], json!("retry-scheduled"));
        assert_eq!(parsed["level"], json!("warning"));
    }

    #[test]
    fn captured_error_creates_the_data_object() {
        let mut rec = record(Level::Error, "Uh oh");
        rec.error = Some(CapturedError {
            name: "ValueError".to_string(),
            message: "What even IS that??".to_string(),
            stack: "ValueError: What even IS that??".to_string(),
        });

        let parsed = parse(&render(rec));
        assert_eq!(parsed["data"]["error"]["name"], json!("ValueError"));
        assert_eq!(
            parsed["data"]["error"]["message"],
            json!("What even IS that??")
        );
        assert_eq!(parsed["level"], json!("error"));
    }

    #[test]
    fn captured_error_keeps_existing_data_siblings() {
        let mut rec = record(Level::Error, "boom");
        rec.fields = json!({"data": {"attempt": 1}}).as_object().cloned().unwrap();
        rec.error = Some(CapturedError {
            name: "Timeout".to_string(),
            message: "deadline exceeded".to_string(),
            stack: "Timeout: deadline exceeded\ncaused by: slow upstream".to_string(),
        });

        let parsed = parse(&render(rec));
        assert_eq!(parsed["data"]["attempt"], json!(1));
        assert_eq!(parsed["data"]["error"]["name"], json!("Timeout"));
    }

    #[test]
    fn captured_error_survives_data_scrubbed_to_a_scalar() {
        let mut rec = record(Level::Error, "boom");
        rec.fields = json!({"data": "SCRUBBED"}).as_object().cloned().unwrap();
        rec.error = Some(CapturedError {
            name: "Timeout".to_string(),
            message: "deadline exceeded".to_string(),
            stack: "Timeout: deadline exceeded".to_string(),
        });

        let parsed = parse(&render(rec));
        assert_eq!(parsed["data"]["error"]["name"], json!("Timeout"));
        assert_eq!(
            parsed["data"]["error"]["message"],
            json!("deadline exceeded")
        );
    }

    #[test]
    fn output_is_a_single_line_even_with_multiline_stacks() {
        let mut rec = record(Level::Error, "boom");
        rec.error = Some(CapturedError {
            name: "Outer".to_string(),
            message: "outer failed".to_string(),
            stack: "Outer: outer failed\ncaused by: bad value".to_string(),
        });

        let line = render(rec);
        assert!(!line.contains('\n'));
        assert!(parse(&line)["data"]["error"]["stack"]
            .as_str()
            .unwrap()
            .contains("caused by: bad value"));
    }

    #[test]
    fn custom_level_names_render_as_registered() {
        let level = Level::Custom {
            name: Arc::from("trace"),
            value: 5,
        };
        let parsed = parse(&render(record(level, "fine detail")));
        assert_eq!(parsed["level"], json!("trace"));
    }
}
