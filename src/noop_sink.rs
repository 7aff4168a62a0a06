use crate::sink::{EmissionError, LogSink};

/// A sink that simply drops all lines.
///
/// Useful for measuring the overhead of record assembly without any I/O,
/// and for unit tests that don't care about output.
#[derive(Clone, Copy, Default)]
pub struct NoopSink;

impl LogSink for NoopSink {
    fn write_line(&self, _line: &str) -> Result<(), EmissionError> {
        Ok(())
    }
}
