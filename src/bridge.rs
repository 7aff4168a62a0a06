use serde_json::{Map, Value};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

use crate::format;
use crate::init;
use crate::level::Level;
use crate::record::LogRecord;

/// `tracing_subscriber` layer forwarding events from dependencies that log
/// through the `tracing` facade into the contextual JSON pipeline.
///
/// Events render as ordinary records: the message under `msg`, the event's
/// target and fields under `data`. Targets listed in the configuration's
/// `dependency_targets` are held to the stricter dependency threshold so
/// SDK internals stay quiet at the default settings; everything else uses
/// the normal emission threshold. The layer is stateless: thresholds and
/// the sink are read from the active pipeline per event, so a re-configure
/// takes effect immediately.
pub struct DependencyBridge;

fn is_noisy(targets: &[String], target: &str) -> bool {
    targets.iter().any(|prefix| {
        target
            .strip_prefix(prefix.as_str())
            .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
    })
}

impl<S> Layer<S> for DependencyBridge
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let Some(pipeline) = init::pipeline() else {
            return;
        };
        if !pipeline.forward_dependencies {
            return;
        }

        let meta = event.metadata();
        let level = if *meta.level() == tracing::Level::ERROR {
            Level::Error
        } else if *meta.level() == tracing::Level::WARN {
            Level::Warning
        } else if *meta.level() == tracing::Level::INFO {
            Level::Info
        } else {
            Level::Debug
        };

        let threshold = if is_noisy(&pipeline.dependency_targets, meta.target()) {
            &pipeline.dependency_threshold
        } else {
            &pipeline.threshold
        };
        if level.value() < threshold.value() {
            return;
        }

        let mut data = Map::new();
        data.insert(
            "target".to_string(),
            Value::String(meta.target().to_string()),
        );
        let mut message = None;
        let mut visitor = FieldVisitor {
            fields: &mut data,
            message: &mut message,
        };
        event.record(&mut visitor);

        let mut fields = Map::new();
        fields.insert("data".to_string(), Value::Object(data));

        let line = format::render(LogRecord {
            level,
            message: message.unwrap_or_default(),
            fields,
            error: None,
        });
        if let Err(err) = pipeline.sink.write_line(&line) {
            eprintln!("invocation-logger: sink write failed: {err}");
        }
    }
}

struct FieldVisitor<'a> {
    fields: &'a mut Map<String, Value>,
    message: &'a mut Option<String>,
}

impl Visit for FieldVisitor<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            *self.message = Some(value.to_string());
        } else {
            self.fields
                .insert(field.name().to_string(), Value::String(value.to_string()));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.fields.insert(field.name().to_string(), Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.fields.insert(field.name().to_string(), Value::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.fields.insert(field.name().to_string(), Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.fields.insert(field.name().to_string(), Value::from(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            *self.message = Some(format!("{value:?}"));
        } else {
            self.fields
                .insert(field.name().to_string(), Value::String(format!("{value:?}")));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::init::{configure_with, LogConfig};
    use crate::memory::MemorySink;
    use serde_json::json;
    use serial_test::serial;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::Registry;

    fn parsed_lines(sink: &MemorySink) -> Vec<Value> {
        sink.lines()
            .iter()
            .map(|line| serde_json::from_str(line).expect("bridge emits valid JSON"))
            .collect()
    }

    fn with_bridge(f: impl FnOnce()) {
        let subscriber = Registry::default().with(DependencyBridge);
        tracing::subscriber::with_default(subscriber, f);
    }

    #[test]
    #[serial]
    fn forwards_events_with_fields_under_data() {
        let sink = MemorySink::default();
        configure_with(sink.clone(), LogConfig::default());

        with_bridge(|| {
            tracing::info!(target: "orders_service", attempt = 2, "sending request");
        });

        let lines = parsed_lines(&sink);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["msg"], json!("sending request"));
        assert_eq!(lines[0]["level"], json!("info"));
        assert_eq!(lines[0]["data"]["target"], json!("orders_service"));
        assert_eq!(lines[0]["data"]["attempt"], json!(2));
    }

    #[test]
    #[serial]
    fn noisy_targets_are_capped_at_the_dependency_threshold() {
        let sink = MemorySink::default();
        configure_with(sink.clone(), LogConfig::default());

        with_bridge(|| {
            tracing::info!(target: "hyper::client", "connection established");
            tracing::info!(target: "aws_sdk::s3", "request sent");
            tracing::warn!(target: "hyper::client", "connection reset");
        });

        let lines = parsed_lines(&sink);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["msg"], json!("connection reset"));
        assert_eq!(lines[0]["level"], json!("warning"));
    }

    #[test]
    #[serial]
    fn prefix_matching_does_not_swallow_similar_names() {
        let sink = MemorySink::default();
        configure_with(sink.clone(), LogConfig::default());

        // `hyperspace` is not under the `hyper` prefix.
        with_bridge(|| {
            tracing::info!(target: "hyperspace", "jump complete");
        });

        let lines = parsed_lines(&sink);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["data"]["target"], json!("hyperspace"));
    }

    #[test]
    #[serial]
    fn forwarding_can_be_disabled() {
        let sink = MemorySink::default();
        let config = LogConfig {
            forward_dependencies: false,
            ..LogConfig::default()
        };
        configure_with(sink.clone(), config);

        with_bridge(|| {
            tracing::error!(target: "orders_service", "ignored");
        });

        assert!(sink.is_empty());
    }
}
