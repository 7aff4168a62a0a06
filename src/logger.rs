use serde_json::{Map, Value};
use std::fmt;

use crate::context::{ContextLayers, Scope};
use crate::format;
use crate::init;
use crate::level::Level;
use crate::record::{self, CapturedError, LogRecord};
use crate::scrub::{self, ScrubHook};

/// Contextual logger: an immutable chain of context layers plus an optional
/// scrub hook, emitting single-line JSON records through the configured
/// sink.
///
/// Loggers are cheap to clone and derive. `with_context`/`with_data` return
/// a child carrying one more layer; the parent is never touched, so a
/// handler can hand children to helpers without losing its own view.
#[derive(Clone)]
pub struct ContextLogger {
    layers: ContextLayers,
    hook: Option<ScrubHook>,
}

impl ContextLogger {
    /// Logger with no initial context. The hook, when given, is fixed for
    /// the lifetime of this logger and every child derived from it.
    pub fn new(hook: Option<ScrubHook>) -> Self {
        Self {
            layers: ContextLayers::new(),
            hook,
        }
    }

    /// Logger pre-seeded with one `context` layer. Builders use this to
    /// attach invocation identity before the caller sees the logger.
    pub(crate) fn seeded(context: Map<String, Value>, hook: Option<ScrubHook>) -> Self {
        Self {
            layers: ContextLayers::new().derive(Scope::Context, context),
            hook,
        }
    }

    /// Child logger with `fields` appended as a `context` layer.
    ///
    /// The fields pass through the scrub hook before they enter the layer.
    /// Within one scope the newest layer shadows older ones whole, so a
    /// second `with_context` replaces the first's fields rather than
    /// merging into them.
    #[must_use]
    pub fn with_context<K, I>(&self, fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        self.derive(Scope::Context, fields)
    }

    /// Child logger with `fields` appended as a `data` layer. Scrubbed and
    /// shadowed exactly like [`with_context`](Self::with_context).
    #[must_use]
    pub fn with_data<K, I>(&self, fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        self.derive(Scope::Data, fields)
    }

    fn derive<K, I>(&self, scope: Scope, fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let fields = fields.into_iter().map(|(k, v)| (k.into(), v)).collect();
        Self {
            layers: self.layers.derive(scope, scrub::apply(self.hook.as_ref(), fields)),
            hook: self.hook.clone(),
        }
    }

    pub fn debug(&self, msg: &str) {
        self.log(Level::Debug, msg);
    }

    pub fn info(&self, msg: &str) {
        self.log(Level::Info, msg);
    }

    pub fn warning(&self, msg: &str) {
        self.log(Level::Warning, msg);
    }

    pub fn error(&self, msg: &str) {
        self.log(Level::Error, msg);
    }

    pub fn critical(&self, msg: &str) {
        self.log(Level::Critical, msg);
    }

    /// Emit `msg` at an explicit level, standard or registered via
    /// [`register_level`](crate::register_level).
    pub fn log(&self, level: Level, msg: &str) {
        self.dispatch(level, msg, &[], None, None, None);
    }

    /// Emit an `error`-level record carrying the error's type name, display
    /// message and cause chain under `data.error`.
    ///
    /// The error is borrowed, not consumed: the call is an observation, and
    /// the caller re-raises or otherwise handles the value afterwards.
    pub fn exception<E>(&self, msg: &str, err: &E)
    where
        E: std::error::Error + ?Sized,
    {
        self.dispatch(
            Level::Error,
            msg,
            &[],
            None,
            None,
            Some(CapturedError::from_error(err)),
        );
    }

    #[cfg(test)]
    pub(crate) fn flattened(&self) -> Map<String, Value> {
        self.layers.flatten()
    }

    /// Start a record at `level` for calls that need call-site extras, a
    /// `type` tag, template args or an attached error.
    pub fn at(&self, level: Level) -> RecordBuilder<'_> {
        RecordBuilder {
            logger: self,
            level,
            extra: None,
            kind: None,
            error: None,
        }
    }

    /// Assemble and write one record.
    ///
    /// Order matters: the threshold check runs first so suppressed records
    /// cost one comparison; call-site extras replace the layered `data` key
    /// whole; the scrub hook sees the complete merged mapping, nested
    /// extras included.
    fn dispatch(
        &self,
        level: Level,
        template: &str,
        args: &[&dyn fmt::Display],
        extra: Option<Map<String, Value>>,
        kind: Option<String>,
        error: Option<CapturedError>,
    ) {
        let Some(pipeline) = init::pipeline() else {
            return;
        };
        if level.value() < pipeline.threshold.value() {
            return;
        }

        let mut fields = self.layers.flatten();
        if let Some(extra) = extra {
            fields.insert("data".to_string(), Value::Object(extra));
        }
        if let Some(kind) = kind {
            fields.insert("type".to_string(), Value::String(kind));
        }
        let fields = scrub::apply(self.hook.as_ref(), fields);

        let line = format::render(LogRecord {
            level,
            message: record::interpolate(template, args),
            fields,
            error,
        });
        if let Err(err) = pipeline.sink.write_line(&line) {
            // Must not panic: an exception() call path still owes the
            // caller its original error.
            eprintln!("invocation-logger: sink write failed: {err}");
        }
    }
}

impl Default for ContextLogger {
    fn default() -> Self {
        Self::new(None)
    }
}

impl fmt::Debug for ContextLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextLogger")
            .field("layers", &self.layers)
            .field("hook", &self.hook.as_ref().map(|_| "_"))
            .finish()
    }
}

/// One record under construction. Dropping the builder without calling
/// [`emit`](Self::emit) writes nothing.
#[must_use = "call emit or emit_args to write the record"]
pub struct RecordBuilder<'a> {
    logger: &'a ContextLogger,
    level: Level,
    extra: Option<Map<String, Value>>,
    kind: Option<String>,
    error: Option<CapturedError>,
}

impl RecordBuilder<'_> {
    /// Call-site structured payload, nested under `data` in the output.
    /// Replaces any layered `data` for this record only.
    pub fn extra<K, I>(mut self, fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let map = self.extra.get_or_insert_with(Map::new);
        for (k, v) in fields {
            map.insert(k.into(), v);
        }
        self
    }

    /// Free-form event-classification tag, hoisted to the top-level `type`
    /// key of the record.
    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Attach an error's details under `data.error` without forcing the
    /// record to `error` level.
    pub fn caused_by<E>(mut self, err: &E) -> Self
    where
        E: std::error::Error + ?Sized,
    {
        self.error = Some(CapturedError::from_error(err));
        self
    }

    pub fn emit(self, msg: &str) {
        self.emit_args(msg, &[]);
    }

    /// Emit with classic `%`-style interpolation: `%s`/`%d`/`%f` each take
    /// the next argument, `%%` is a literal percent.
    pub fn emit_args(self, template: &str, args: &[&dyn fmt::Display]) {
        self.logger.dispatch(
            self.level,
            template,
            args,
            self.extra,
            self.kind,
            self.error,
        );
    }
}
