use serde_json::{Map, Value};
use std::sync::Arc;

/// Scope tag of one context layer: request-shaped `context` fields or
/// free-form `data` fields. The tag doubles as the top-level key the layer
/// occupies in the flattened view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Context,
    Data,
}

impl Scope {
    pub fn key(self) -> &'static str {
        match self {
            Scope::Context => "context",
            Scope::Data => "data",
        }
    }
}

/// One immutable increment of contextual state.
#[derive(Debug)]
struct Layer {
    scope: Scope,
    fields: Map<String, Value>,
}

/// Ordered, immutable chain of context layers with structural sharing.
///
/// Deriving copies the spine of `Arc` pointers and appends one new layer;
/// the layers themselves are shared and never mutated, so a parent's
/// flattened view is unaffected by any child derived from it and the chain
/// is safe to read from concurrent clones without locking.
#[derive(Debug, Clone, Default)]
pub struct ContextLayers {
    layers: Vec<Arc<Layer>>,
}

impl ContextLayers {
    pub fn new() -> Self {
        Self::default()
    }

    /// New store = this store's layers plus one appended `{scope: fields}`
    /// layer. `self` is left untouched.
    #[must_use]
    pub fn derive(&self, scope: Scope, fields: Map<String, Value>) -> Self {
        let mut layers = self.layers.clone();
        layers.push(Arc::new(Layer { scope, fields }));
        Self { layers }
    }

    /// Fold the chain oldest→newest into one mapping. Later layers override
    /// earlier ones at top-level-key granularity: a newer `context` layer
    /// shadows an older one entirely, nested maps are not merged.
    pub fn flatten(&self) -> Map<String, Value> {
        let mut out = Map::new();
        for layer in &self.layers {
            out.insert(
                layer.scope.key().to_string(),
                Value::Object(layer.fields.clone()),
            );
        }
        out
    }
}
