use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use thiserror::Error;

/// Ordered log severity.
///
/// Ordering is numeric: a record is enabled when its severity is greater
/// than or equal to the configured minimum. `Unknown` sits below every
/// real level, so a logger configured with it lets everything through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum Severity {
    Unknown = 0,
    Debug,
    Trace,
    Info,
    Warning,
    Error,
    Fatal,
}

/// Every defined severity paired with its label, in ascending order.
const LEVELS: [(Severity, &str); 7] = [
    (Severity::Unknown, "UNKNOWN"),
    (Severity::Debug, "DEBUG"),
    (Severity::Trace, "TRACE"),
    (Severity::Info, "INFO"),
    (Severity::Warning, "WARNING"),
    (Severity::Error, "ERROR"),
    (Severity::Fatal, "FATAL"),
];

lazy_static! {
    /// Reverse lookup from upper-case label to severity, built once.
    static ref LABEL_TO_LEVEL: HashMap<&'static str, Severity> =
        LEVELS.iter().map(|&(level, label)| (label, level)).collect();
}

/// Returned when a string does not name one of the defined severities.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid log level: {0:?}")]
pub struct ParseLevelError(pub String);

impl Severity {
    /// All seven severities, lowest first.
    pub const ALL: [Severity; 7] = [
        Severity::Unknown,
        Severity::Debug,
        Severity::Trace,
        Severity::Info,
        Severity::Warning,
        Severity::Error,
        Severity::Fatal,
    ];

    /// Maps a raw numeric value back to a severity. Out-of-range values
    /// collapse to `Unknown`.
    pub fn from_u16(value: u16) -> Severity {
        LEVELS
            .get(value as usize)
            .map(|&(level, _)| level)
            .unwrap_or(Severity::Unknown)
    }

    /// Upper-case label used in rendered lines.
    pub fn as_str(self) -> &'static str {
        LEVELS[self as usize].1
    }

    /// Closest `log` crate filter, used when bridging into the `log` facade.
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            // DEBUG sorts below TRACE here, so both enable everything `log` emits.
            Severity::Unknown | Severity::Debug | Severity::Trace => log::LevelFilter::Trace,
            Severity::Info => log::LevelFilter::Info,
            Severity::Warning => log::LevelFilter::Warn,
            Severity::Error | Severity::Fatal => log::LevelFilter::Error,
        }
    }
}

impl From<log::Level> for Severity {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Severity::Error,
            log::Level::Warn => Severity::Warning,
            log::Level::Info => Severity::Info,
            log::Level::Debug => Severity::Debug,
            log::Level::Trace => Severity::Trace,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_level(s)
    }
}

/// Parses a severity label, ignoring ASCII case.
///
/// ```
/// # use rotlog::{parse_level, Severity};
/// assert_eq!(parse_level("warning").unwrap(), Severity::Warning);
/// assert!(parse_level("verbose").is_err());
/// ```
pub fn parse_level(s: &str) -> Result<Severity, ParseLevelError> {
    let upper = s.to_ascii_uppercase();
    LABEL_TO_LEVEL
        .get(upper.as_str())
        .copied()
        .ok_or_else(|| ParseLevelError(s.to_string()))
}

/// Label for a raw severity value; anything undefined renders as `UNKNOWN`.
pub fn level_to_string(value: u16) -> &'static str {
    Severity::from_u16(value).as_str()
}
