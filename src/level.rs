use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Standard severity table. The classic numeric spacing is kept so custom
/// levels can slot between the built-ins.
const STANDARD_LEVELS: [(&str, u32); 5] = [
    ("debug", 10),
    ("info", 20),
    ("warning", 30),
    ("error", 40),
    ("critical", 50),
];

/// Process-wide table of levels added via [`register_level`].
static CUSTOM_LEVELS: RwLock<Vec<(Arc<str>, u32)>> = RwLock::new(Vec::new());

fn read_table() -> RwLockReadGuard<'static, Vec<(Arc<str>, u32)>> {
    CUSTOM_LEVELS.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_table() -> RwLockWriteGuard<'static, Vec<(Arc<str>, u32)>> {
    CUSTOM_LEVELS.write().unwrap_or_else(PoisonError::into_inner)
}

/// Named numeric severity attached to every emitted record.
///
/// Levels compare by numeric [`value`](Level::value) for threshold checks;
/// no ordering traits are implemented because a custom level may share a
/// numeric value with a standard one without being equal to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Level {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
    /// Dynamically registered severity, produced by [`register_level`] or
    /// [`Level::named`]. The name is interned lowercase.
    Custom { name: Arc<str>, value: u32 },
}

impl Level {
    /// Numeric severity used for threshold comparisons.
    pub fn value(&self) -> u32 {
        match self {
            Level::Debug => 10,
            Level::Info => 20,
            Level::Warning => 30,
            Level::Error => 40,
            Level::Critical => 50,
            Level::Custom { value, .. } => *value,
        }
    }

    /// Lower-cased name exactly as it appears in the serialized `level` key.
    pub fn name(&self) -> &str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warning => "warning",
            Level::Error => "error",
            Level::Critical => "critical",
            Level::Custom { name, .. } => name,
        }
    }

    /// Case-insensitive lookup across the standard table and the custom
    /// registry. Returns `None` for names that were never registered.
    pub fn named(name: &str) -> Option<Level> {
        match name.to_ascii_lowercase().as_str() {
            "debug" => Some(Level::Debug),
            "info" => Some(Level::Info),
            "warning" => Some(Level::Warning),
            "error" => Some(Level::Error),
            "critical" => Some(Level::Critical),
            other => read_table()
                .iter()
                .find(|(n, _)| n.as_ref() == other)
                .map(|(n, value)| Level::Custom {
                    name: Arc::clone(n),
                    value: *value,
                }),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error type returned when the level registry is misconfigured.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("level name `{0}` collides with an existing level")]
    LevelExists(String),

    #[error("level name `{0}` is not a valid identifier")]
    InvalidLevelName(String),
}

/// Add a named severity to the process-wide level table.
///
/// **Parameters**
/// - `name`: identifier-like, case-insensitive; stored lowercase.
/// - `value`: numeric severity compared against the configured threshold.
///
/// **Returns**
/// - `Ok(Level)` handle usable with `log`/`at` on any logger.
/// - `Err(ConfigError)` if the name is invalid or collides with a standard
///   or already-registered level.
///
/// Registration mutates global state. Test suites must pair it with
/// [`unregister_level`] to avoid leaking levels across tests.
pub fn register_level(name: &str, value: u32) -> Result<Level, ConfigError> {
    let lower = name.to_ascii_lowercase();
    let mut chars = lower.chars();
    let valid = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return Err(ConfigError::InvalidLevelName(name.to_string()));
    }

    if STANDARD_LEVELS.iter().any(|(n, _)| *n == lower) {
        return Err(ConfigError::LevelExists(lower));
    }

    let mut table = write_table();
    if table.iter().any(|(n, _)| n.as_ref() == lower.as_str()) {
        return Err(ConfigError::LevelExists(lower));
    }

    let interned: Arc<str> = lower.into();
    table.push((Arc::clone(&interned), value));
    Ok(Level::Custom {
        name: interned,
        value,
    })
}

/// Remove a custom level from the process-wide table.
///
/// Returns `true` if a level was removed. Standard levels are never removed.
pub fn unregister_level(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    let mut table = write_table();
    let before = table.len();
    table.retain(|(n, _)| n.as_ref() != lower.as_str());
    table.len() != before
}
