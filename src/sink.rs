/// Error type returned when a sink rejects a rendered line.
///
/// The emission path never propagates this to callers: a failing write is
/// reported on stderr and swallowed, so logging can never mask the business
/// error that was being logged.
#[derive(thiserror::Error, Debug)]
pub enum EmissionError {
    #[error("sink write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("sink rejected record: {0}")]
    Rejected(String),
}

/// Synchronous destination for rendered log lines.
///
/// Implementations receive one complete single-line JSON document per call
/// and are expected to complete before returning; the pipeline performs no
/// buffering, batching or background I/O on their behalf.
pub trait LogSink: Send + Sync {
    /// Write one rendered record to the underlying destination.
    ///
    /// **Parameters**
    /// - `line`: a single-line UTF-8 JSON object, without trailing newline.
    ///
    /// **Returns**
    /// - `Ok(())` if the line was accepted.
    /// - `Err(..)` if the destination failed. The pipeline reports the
    ///   failure on stderr and drops the record; it is never retried.
    fn write_line(&self, line: &str) -> Result<(), EmissionError>;

    /// Flush any buffering the destination performs on its own.
    ///
    /// Default implementation is a no-op.
    fn flush(&self) -> Result<(), EmissionError> {
        Ok(())
    }
}
