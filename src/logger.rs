use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use crate::callsite::CallSite;
use crate::clock;
use crate::error::ConfigError;
use crate::level::{parse_level, Severity};
use crate::rotating_file::{RotatingFileSink, SinkStats};
use crate::sink::{ConsoleSink, Sink};
use crate::template::{render, LogRecord, Template};

/// Construction parameters for a [`Logger`].
///
/// Everything is validated by [`Logger::new`]; a bad value there means no
/// logger at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerConfig {
    /// Minimum severity label, case-insensitive.
    pub level: String,
    /// Log directory, created recursively if absent. Empty disables file output.
    pub directory: PathBuf,
    pub file_name: String,
    /// `"simple"` or `"standard"`.
    pub template: String,
    /// Per-stream rotation threshold in bytes. `0` never rotates.
    pub max_file_size: u64,
    /// Mirror `ERROR` and above into `<file_name>.err`.
    pub separate_errors: bool,
    pub console: bool,
    pub file: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
            directory: PathBuf::new(),
            file_name: "app.log".to_string(),
            template: "standard".to_string(),
            max_file_size: 10 * 1024 * 1024,
            separate_errors: false,
            console: true,
            file: true,
        }
    }
}

impl LoggerConfig {
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = directory.into();
        self
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = bytes;
        self
    }

    pub fn with_separate_errors(mut self, enabled: bool) -> Self {
        self.separate_errors = enabled;
        self
    }

    pub fn with_console(mut self, enabled: bool) -> Self {
        self.console = enabled;
        self
    }

    pub fn with_file(mut self, enabled: bool) -> Self {
        self.file = enabled;
        self
    }
}

/// Level-gated front end that renders records and fans them out to sinks.
///
/// Callers normally go through the per-severity macros ([`debug!`],
/// [`trace!`], [`info!`], [`warning!`], [`error!`], [`fatal!`]), which
/// capture the call site and skip all formatting when the severity is
/// filtered out.
///
/// Logging never fails from the caller's point of view. `fatal!` logs at
/// `FATAL` and returns; ending the process is up to the caller.
///
/// # Examples
///
/// ```
/// use rotlog::{Logger, LoggerConfig};
///
/// let logger = Logger::new(
///     LoggerConfig::default()
///         .with_level("ERROR")
///         .with_console(true),
/// )
/// .unwrap();
///
/// rotlog::info!(logger, "filtered out");
/// rotlog::error!(logger, "boom {}", 7);
/// ```
///
/// [`debug!`]: crate::debug!
/// [`trace!`]: crate::trace!
/// [`info!`]: crate::info!
/// [`warning!`]: crate::warning!
/// [`error!`]: crate::error!
/// [`fatal!`]: crate::fatal!
pub struct Logger {
    level: Severity,
    template: Template,
    sinks: Vec<Arc<dyn Sink>>,
    console: bool,
    file: Option<Arc<RotatingFileSink>>,
}

impl Logger {
    /// Validates `config` and opens whatever outputs it asks for.
    pub fn new(config: LoggerConfig) -> Result<Self, ConfigError> {
        let level = parse_level(&config.level)?;
        let template = Template::from_name(&config.template)?;

        let mut sinks: Vec<Arc<dyn Sink>> = Vec::new();
        if config.console {
            sinks.push(Arc::new(ConsoleSink));
        }

        let mut file = None;
        if !config.directory.as_os_str().is_empty() {
            fs::create_dir_all(&config.directory).map_err(|source| {
                ConfigError::CreateDirectory {
                    path: config.directory.clone(),
                    source,
                }
            })?;

            if config.file {
                let sink = Arc::new(RotatingFileSink::open(
                    &config.directory,
                    &config.file_name,
                    config.max_file_size,
                    config.separate_errors,
                )?);
                sinks.push(sink.clone());
                file = Some(sink);
            }
        }

        tracing::debug!(%level, %template, file = file.is_some(), "logger constructed");
        Ok(Self {
            level,
            template,
            sinks,
            console: config.console,
            file,
        })
    }

    /// Builds a logger over caller-supplied sinks, with no console or file
    /// output of its own.
    pub fn with_sinks(level: Severity, template: Template, sinks: Vec<Arc<dyn Sink>>) -> Self {
        Self {
            level,
            template,
            sinks,
            console: false,
            file: None,
        }
    }

    pub fn add_sink(&mut self, sink: Arc<dyn Sink>) {
        self.sinks.push(sink);
    }

    pub fn level(&self) -> Severity {
        self.level
    }

    pub fn template(&self) -> Template {
        self.template
    }

    /// Whether a record at `severity` would be emitted.
    #[inline]
    pub fn enabled(&self, severity: Severity) -> bool {
        severity >= self.level
    }

    /// Whether a [`ConsoleSink`] was wired in at construction.
    pub fn writes_to_console(&self) -> bool {
        self.console
    }

    pub fn file_sink(&self) -> Option<&RotatingFileSink> {
        self.file.as_deref()
    }

    pub fn file_stats(&self) -> Option<SinkStats> {
        self.file.as_ref().map(|sink| sink.stats())
    }

    /// Renders and emits one record. Does nothing when `severity` is
    /// filtered out; `args` is not formatted in that case.
    pub fn log(&self, severity: Severity, site: CallSite<'_>, args: fmt::Arguments<'_>) {
        if severity < self.level {
            return;
        }

        let record = LogRecord {
            time: clock::now(),
            message: fmt::format(args),
            severity,
            site,
            process_id: std::process::id(),
            thread_id: clock::current_thread_id(),
        };
        let line = render(self.template, &record);

        for sink in &self.sinks {
            sink.emit(severity, &line);
        }
    }

    /// Installs this logger as the `log` crate's global backend.
    pub fn install(self) -> Result<(), log::SetLoggerError> {
        let max_level = self.level.to_level_filter();
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(max_level);
        Ok(())
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level)
            .field("template", &self.template)
            .field("sinks", &self.sinks.len())
            .field("console", &self.console)
            .field("file", &self.file.as_ref().map(|sink| sink.main_path()))
            .finish()
    }
}

/// Bridge for records coming through the `log` facade. The module path
/// stands in for the function name, which `log` does not carry.
impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        Severity::from(metadata.level()) >= self.level
    }

    fn log(&self, record: &log::Record<'_>) {
        let site = CallSite::new(
            record.module_path().unwrap_or("<unknown>"),
            record.file().unwrap_or("<unknown>"),
            record.line().unwrap_or(0),
        );
        Logger::log(self, record.level().into(), site, *record.args());
    }

    fn flush(&self) {}
}

/// Logs at an explicit severity. The per-severity macros expand to this.
#[macro_export]
macro_rules! log_at {
    ($logger:expr, $severity:expr, $($arg:tt)+) => {{
        let logger = &$logger;
        let severity = $severity;
        if logger.enabled(severity) {
            logger.log(severity, $crate::call_site!(), format_args!($($arg)+));
        }
    }};
}

#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::Severity::Debug, $($arg)+)
    };
}

#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::Severity::Trace, $($arg)+)
    };
}

#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::Severity::Info, $($arg)+)
    };
}

#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::Severity::Warning, $($arg)+)
    };
}

#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::Severity::Error, $($arg)+)
    };
}

/// Logs at `FATAL`. The process keeps running.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::Severity::Fatal, $($arg)+)
    };
}
