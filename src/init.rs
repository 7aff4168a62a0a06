use std::sync::{Arc, Once, PoisonError, RwLock};

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

use crate::bridge::DependencyBridge;
use crate::env;
use crate::level::Level;
use crate::sink::LogSink;

/// Dependency targets held to the stricter dependency threshold by default.
/// Cloud SDK and HTTP-stack internals chatter below `warning` on every
/// remote call.
pub const DEFAULT_DEPENDENCY_TARGETS: [&str; 6] =
    ["aws_config", "aws_smithy", "aws_sdk", "hyper", "h2", "rustls"];

/// Process-wide logging configuration.
///
/// **Fields**
/// - `level`: emission threshold for records produced by [`ContextLogger`]
///   and for dependency events from targets not listed below.
/// - `dependency_level`: stricter threshold applied to the noisy targets.
/// - `dependency_targets`: target prefixes subject to `dependency_level`.
///   `hyper` covers `hyper` itself and every `hyper::...` module.
/// - `forward_dependencies`: when `true`, events from libraries using the
///   `tracing` facade are rendered through the same JSON pipeline.
///
/// [`ContextLogger`]: crate::logger::ContextLogger
#[derive(Clone, Debug)]
pub struct LogConfig {
    pub level: Level,
    pub dependency_level: Level,
    pub dependency_targets: Vec<String>,
    pub forward_dependencies: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::Info,
            dependency_level: Level::Warning,
            dependency_targets: DEFAULT_DEPENDENCY_TARGETS
                .iter()
                .map(|t| t.to_string())
                .collect(),
            forward_dependencies: true,
        }
    }
}

/// Active sink plus thresholds, swapped wholesale on each configure call.
pub(crate) struct Pipeline {
    pub(crate) threshold: Level,
    pub(crate) dependency_threshold: Level,
    pub(crate) dependency_targets: Vec<String>,
    pub(crate) forward_dependencies: bool,
    pub(crate) sink: Box<dyn LogSink>,
}

static PIPELINE: RwLock<Option<Arc<Pipeline>>> = RwLock::new(None);

/// Snapshot of the current pipeline. Loggers read this on every emission,
/// so records written after a re-configure go to the new sink even through
/// loggers built before it.
pub(crate) fn pipeline() -> Option<Arc<Pipeline>> {
    PIPELINE
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Install `sink` as the process-wide log destination with default
/// thresholds.
///
/// **Parameters**
/// - `sink`: implementation of [`LogSink`] receiving one rendered JSON
///   line per record.
///
/// **Behavior**
///
/// Equivalent to [`configure_with`] using [`LogConfig::default`]: `info`
/// threshold, dependency targets capped at `warning`. Re-entrant: calling
/// it again replaces the previous sink entirely, never stacks a second
/// one.
pub fn configure(sink: impl LogSink + 'static) {
    configure_with(sink, LogConfig::default());
}

/// Install `sink` with explicit thresholds.
///
/// **Parameters**
/// - `sink`: implementation of [`LogSink`] receiving rendered lines.
/// - `config`: [`LogConfig`] controlling thresholds and dependency
///   forwarding.
///
/// **Effects**
///
/// Replaces the active pipeline in one step; exactly one sink is attached
/// afterwards no matter how often this is called. On first use it also
/// registers the process-wide `tracing` subscriber that forwards
/// dependency events. A host that already installed its own subscriber
/// keeps it; the contextual pipeline works regardless.
pub fn configure_with(sink: impl LogSink + 'static, config: LogConfig) {
    let pipeline = Arc::new(Pipeline {
        threshold: config.level,
        dependency_threshold: config.dependency_level,
        dependency_targets: config.dependency_targets,
        forward_dependencies: config.forward_dependencies,
        sink: Box::new(sink),
    });
    *PIPELINE.write().unwrap_or_else(PoisonError::into_inner) = Some(pipeline);
    install_bridge();
}

/// [`configure`] with the emission threshold taken from the `LOG_LEVEL`
/// environment variable, the way hosted entrypoints bootstrap.
pub fn configure_from_env(sink: impl LogSink + 'static) {
    let config = LogConfig {
        level: env::level_from_env(),
        ..LogConfig::default()
    };
    configure_with(sink, config);
}

static INSTALL_BRIDGE: Once = Once::new();

fn install_bridge() {
    INSTALL_BRIDGE.call_once(|| {
        let subscriber = Registry::default().with(DependencyBridge);
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}

/// Tear down the pipeline. Subsequent emissions are dropped until the next
/// configure call.
pub fn reset() {
    *PIPELINE.write().unwrap_or_else(PoisonError::into_inner) = None;
}
