use serde_json::{Map, Value};
use std::sync::Arc;

/// Injected redaction function applied to structured payloads before they
/// reach a layer or the wire.
///
/// A hook is set once at logger construction and is immutable thereafter.
/// It runs over every `with_context`/`with_data` payload before the payload
/// enters a layer, and over the final merged mapping before serialization,
/// so nested call-site fields are covered as well. Hooks receive the
/// mapping by value and return the cleaned mapping; they may run more than
/// once over already-cleaned fields and must tolerate that.
pub type ScrubHook = Arc<dyn Fn(Map<String, Value>) -> Map<String, Value> + Send + Sync>;

/// Run `fields` through the hook when one is present.
pub(crate) fn apply(hook: Option<&ScrubHook>, fields: Map<String, Value>) -> Map<String, Value> {
    match hook {
        Some(hook) => hook(fields),
        None => fields,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_hook_leaves_fields_unchanged() {
        let mut fields = Map::new();
        fields.insert("email".to_string(), json!("me@example.com"));

        let out = apply(None, fields.clone());
        assert_eq!(out, fields);
    }

    #[test]
    fn present_hook_rewrites_fields() {
        let hook: ScrubHook = Arc::new(|mut fields| {
            fields.insert("email".to_string(), json!("[redacted]"));
            fields
        });

        let mut fields = Map::new();
        fields.insert("email".to_string(), json!("me@example.com"));
        fields.insert("id".to_string(), json!(7));

        let out = apply(Some(&hook), fields);
        assert_eq!(out["email"], json!("[redacted]"));
        assert_eq!(out["id"], json!(7));
    }
}
