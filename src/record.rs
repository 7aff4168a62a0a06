use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::fmt::Write as _;

use crate::level::Level;

/// One fully-assembled log record, ready for serialization.
///
/// `fields` already holds the merged, scrubbed top-level mapping
/// (`context`/`data`/`type`); `message` is already interpolated.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub level: Level,
    pub message: String,
    pub fields: Map<String, Value>,
    pub error: Option<CapturedError>,
}

/// Error details captured by an `exception` call, serialized under
/// `data.error`. `name` and `message` are exact; `stack` is the rendered
/// cause chain and is informational only.
#[derive(Debug, Clone, Serialize)]
pub struct CapturedError {
    pub name: String,
    pub message: String,
    pub stack: String,
}

impl CapturedError {
    /// Capture an error's static type name, display message and source
    /// chain. The error is only borrowed: logging is an observation, and
    /// callers keep propagating the value afterwards.
    pub fn from_error<E>(err: &E) -> Self
    where
        E: std::error::Error + ?Sized,
    {
        let name = short_type_name(std::any::type_name::<E>());
        let message = err.to_string();

        let mut stack = format!("{name}: {message}");
        let mut source = err.source();
        while let Some(cause) = source {
            let _ = write!(stack, "\ncaused by: {cause}");
            source = cause.source();
        }

        Self {
            name: name.to_string(),
            message,
            stack,
        }
    }
}

/// Last path segment of a fully-qualified type name, generics stripped.
fn short_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Render a classic `%`-style message template against positional args.
///
/// `%s`, `%d` and `%f` all format the next argument through `Display`; `%%`
/// escapes a literal percent. A template with no args is returned verbatim.
/// Surplus specifiers stay in place and surplus arguments are ignored: a
/// malformed template must never prevent the record from being emitted.
pub(crate) fn interpolate(template: &str, args: &[&dyn fmt::Display]) -> String {
    if args.is_empty() {
        return template.to_string();
    }

    let mut out = String::with_capacity(template.len() + 16);
    let mut next = 0;
    let mut chars = template.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('%') => out.push('%'),
            Some(marker @ ('s' | 'd' | 'f')) => match args.get(next) {
                Some(arg) => {
                    let _ = write!(out, "{arg}");
                    next += 1;
                }
                None => {
                    out.push('%');
                    out.push(marker);
                }
            },
            Some(other) => {
                out.push('%');
                out.push(other);
            }
            None => out.push('%'),
        }
    }
    out
}
