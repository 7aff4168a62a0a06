use std::sync::{PoisonError, RwLock};

use crate::logger::ContextLogger;

static CURRENT: RwLock<Option<ContextLogger>> = RwLock::new(None);

/// Cache the invocation's logger for code without access to the handle.
///
/// This is a convenience only. The cache is process-wide: hosts running
/// concurrent invocations in one process must not rely on it and should
/// pass the logger explicitly instead, since the slot is not safe against
/// concurrent re-initialization.
pub fn set_current(logger: ContextLogger) {
    *CURRENT.write().unwrap_or_else(PoisonError::into_inner) = Some(logger);
}

/// Clone of the cached logger, if an entrypoint stored one.
pub fn current() -> Option<ContextLogger> {
    CURRENT
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Drop the cached logger, typically at the end of an invocation.
pub fn clear_current() {
    *CURRENT.write().unwrap_or_else(PoisonError::into_inner) = None;
}
