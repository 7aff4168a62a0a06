use std::io::Write;

use crate::sink::{EmissionError, LogSink};

/// Sink writing one line per record to stdout.
///
/// Hosted serverless platforms capture stdout and attach their own
/// ingestion timestamps. Every write is flushed immediately because the
/// process may be frozen between invocations at any point.
#[derive(Clone, Copy, Default)]
pub struct StdoutSink;

impl LogSink for StdoutSink {
    fn write_line(&self, line: &str) -> Result<(), EmissionError> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "{line}")?;
        out.flush()?;
        Ok(())
    }
}
