pub mod level;
pub mod record;
pub mod context;
pub mod scrub;
pub mod format;

pub mod sink;
pub mod stdout;
pub mod memory;
pub mod noop_sink;

pub mod logger;
pub mod builders;
pub mod bridge;
pub mod init;
pub mod env;
pub mod current;

pub use builders::{bus_event, empty, invocation, notification, InvocationContext, ShapeError};
pub use current::{clear_current, current, set_current};
pub use init::{configure, configure_from_env, configure_with, LogConfig};
pub use level::{register_level, unregister_level, ConfigError, Level};
pub use logger::{ContextLogger, RecordBuilder};
pub use memory::MemorySink;
pub use noop_sink::NoopSink;
pub use scrub::ScrubHook;
pub use sink::{EmissionError, LogSink};
pub use stdout::StdoutSink;
