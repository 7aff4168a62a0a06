use invocation_logger::{configure, notification, InvocationContext, StdoutSink};
use serde_json::{json, Value};

#[derive(Debug, thiserror::Error)]
#[error("order {0} has no shipping address")]
struct MissingAddress(String);

fn handle(event: &Value, ctx: &InvocationContext) -> Result<(), MissingAddress> {
    let logger =
        notification(event, ctx, Some("orders"), None).expect("platform delivers one record");
    logger.info("Logging event data");

    let logger = logger.with_data([("order_id", json!("ord-7"))]);
    let result = Err(MissingAddress("ord-7".to_string()));
    if let Err(err) = &result {
        // Observation only; the error still propagates to the platform.
        logger.exception("Unhandled error in handler", err);
    }
    result
}

fn main() {
    configure(StdoutSink);

    let ctx = InvocationContext {
        request_id: "7ec0c923-5002-4cdb-a52b-71704a83a387".to_string(),
        function_name: "process-orders".to_string(),
        function_version: "12".to_string(),
    };
    let event = json!({
        "records": [{
            "id": "9d8f54c6-3c4b-4b2e-a9c8-1f1d6c2fbf4e",
            "type": "Notification",
            "topic": "arn:orders:created",
            "subject": "order created"
        }]
    });

    if let Err(err) = handle(&event, &ctx) {
        eprintln!("invocation failed: {err}");
    }
}
