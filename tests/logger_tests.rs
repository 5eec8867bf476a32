use rotlog::{
    error, fatal, info, log_at, render, warning, CallSite, ConfigError, LogRecord, Logger,
    LoggerConfig, Severity, Sink, Template,
};
use std::fmt;
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::tempdir;

const EMITTING: [Severity; 6] = [
    Severity::Debug,
    Severity::Trace,
    Severity::Info,
    Severity::Warning,
    Severity::Error,
    Severity::Fatal,
];

struct CountingSink {
    count: Arc<AtomicUsize>,
}

impl CountingSink {
    fn new() -> Self {
        Self {
            count: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl Sink for CountingSink {
    fn emit(&self, _severity: Severity, _line: &str) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

struct CollectingSink {
    lines: Arc<Mutex<Vec<(Severity, String)>>>,
}

impl CollectingSink {
    fn new() -> Self {
        Self {
            lines: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl Sink for CollectingSink {
    fn emit(&self, severity: Severity, line: &str) {
        self.lines.lock().unwrap().push((severity, line.to_string()));
    }
}

/// Counts how many times it gets formatted.
struct FormatProbe(Arc<AtomicUsize>);

impl fmt::Display for FormatProbe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fetch_add(1, Ordering::SeqCst);
        f.write_str("probe")
    }
}

fn collecting_logger(level: Severity, template: Template) -> (Logger, Arc<Mutex<Vec<(Severity, String)>>>) {
    let sink = CollectingSink::new();
    let lines = sink.lines.clone();
    (Logger::with_sinks(level, template, vec![Arc::new(sink)]), lines)
}

#[test]
fn test_dispatch_gate_for_every_pair() {
    for minimum in Severity::ALL {
        for severity in EMITTING {
            let sink = CountingSink::new();
            let count = sink.count.clone();
            let logger = Logger::with_sinks(minimum, Template::Simple, vec![Arc::new(sink)]);

            log_at!(logger, severity, "message at {}", severity);

            let expected = usize::from(severity >= minimum);
            assert_eq!(
                count.load(Ordering::SeqCst),
                expected,
                "severity {severity} with minimum {minimum}"
            );
        }
    }
}

#[test]
fn test_filtered_call_does_no_formatting() {
    let formatted = Arc::new(AtomicUsize::new(0));
    let sink = CountingSink::new();
    let count = sink.count.clone();
    let logger = Logger::with_sinks(Severity::Error, Template::Standard, vec![Arc::new(sink)]);

    info!(logger, "value {}", FormatProbe(formatted.clone()));
    warning!(logger, "value {}", FormatProbe(formatted.clone()));
    assert_eq!(formatted.load(Ordering::SeqCst), 0, "Filtered calls must not format");
    assert_eq!(count.load(Ordering::SeqCst), 0);

    error!(logger, "value {}", FormatProbe(formatted.clone()));
    assert_eq!(formatted.load(Ordering::SeqCst), 1);
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn test_error_only_logger_reports_call_site() {
    let (logger, lines) = collecting_logger(Severity::Error, Template::Standard);

    info!(logger, "hello");
    let expected_line = line!() + 1;
    error!(logger, "boom {}", 7);

    let lines = lines.lock().unwrap();
    assert_eq!(lines.len(), 1);
    let (severity, line) = &lines[0];
    assert_eq!(*severity, Severity::Error);
    assert!(line.contains(&format!("[PID-{}]", std::process::id())));
    assert!(line.contains(" - [ERROR] - "));
    assert!(
        line.ends_with(&format!(
            " - boom 7 - test_error_only_logger_reports_call_site - [Line-{expected_line}] - logger_tests.rs\n"
        )),
        "unexpected line: {line:?}"
    );
}

#[test]
fn test_call_site_inside_closure() {
    let (logger, lines) = collecting_logger(Severity::Debug, Template::Standard);

    let helper = || {
        fatal!(logger, "inside closure");
    };
    helper();
    let closure_line = line!() - 3;

    let lines = lines.lock().unwrap();
    assert!(lines[0].1.ends_with(&format!(
        " - inside closure - test_call_site_inside_closure - [Line-{closure_line}] - logger_tests.rs\n"
    )));
}

#[test]
fn test_fatal_does_not_terminate() {
    let (logger, lines) = collecting_logger(Severity::Info, Template::Simple);
    fatal!(logger, "giving up");
    info!(logger, "still running");
    assert_eq!(lines.lock().unwrap().len(), 2);
}

#[test]
fn test_simple_template_output() {
    let (logger, lines) = collecting_logger(Severity::Info, Template::Simple);
    warning!(logger, "low memory: {} MB", 12);

    let lines = lines.lock().unwrap();
    let line = &lines[0].1;
    assert!(line.ends_with(" - [WARNING] - low memory: 12 MB\n"));
    // "YYYY-MM-DD HH:MM:SS.mmm"
    assert_eq!(line.find(" - "), Some(23));
}

#[test]
fn test_rendering_is_idempotent() {
    let record = LogRecord {
        time: chrono::Local::now(),
        message: "same bytes".to_string(),
        severity: Severity::Info,
        site: CallSite::new("svc::handler", "src/handler.rs", 12),
        process_id: 1,
        thread_id: 2,
    };
    for template in [Template::Simple, Template::Standard] {
        assert_eq!(render(template, &record), render(template, &record));
    }
}

#[test]
fn test_unknown_template_fails_construction() {
    let result = Logger::new(LoggerConfig::default().with_template("fancy"));
    assert!(matches!(result, Err(ConfigError::UnsupportedTemplate(name)) if name == "fancy"));
}

#[test]
fn test_invalid_level_fails_construction() {
    let result = Logger::new(LoggerConfig::default().with_level("loud"));
    assert!(matches!(result, Err(ConfigError::InvalidLevel(_))));
}

#[test]
fn test_unusable_directory_fails_construction() {
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    fs::write(&blocker, "").unwrap();

    let result = Logger::new(
        LoggerConfig::default()
            .with_directory(blocker.join("logs"))
            .with_console(false),
    );
    assert!(matches!(result, Err(ConfigError::CreateDirectory { .. })));
}

#[test]
fn test_directory_is_created_recursively() {
    let dir = tempdir().unwrap();
    let nested = dir.path().join("a").join("b").join("c");

    let logger = Logger::new(
        LoggerConfig::default()
            .with_directory(&nested)
            .with_file_name("nested.log")
            .with_console(false),
    )
    .unwrap();

    assert!(nested.join("nested.log").is_file());
    assert_eq!(logger.file_sink().unwrap().main_path(), nested.join("nested.log"));
}

#[test]
fn test_empty_directory_disables_file_output() {
    let logger = Logger::new(
        LoggerConfig::default()
            .with_directory("")
            .with_file(true)
            .with_console(false),
    )
    .unwrap();
    assert!(logger.file_sink().is_none());
    assert!(logger.file_stats().is_none());
}

#[test]
fn test_file_flag_off_opens_nothing() {
    let dir = tempdir().unwrap();
    let logger = Logger::new(
        LoggerConfig::default()
            .with_directory(dir.path())
            .with_file(false)
            .with_console(false),
    )
    .unwrap();

    error!(logger, "nowhere to go");
    assert!(logger.file_sink().is_none());
    assert!(!dir.path().join("app.log").exists());
}

#[test]
fn test_level_parsing_is_case_insensitive_at_construction() {
    let logger = Logger::new(LoggerConfig::default().with_level("wArNiNg").with_console(false)).unwrap();
    assert_eq!(logger.level(), Severity::Warning);
    assert!(!logger.enabled(Severity::Info));
    assert!(logger.enabled(Severity::Fatal));
}

#[test]
fn test_file_and_extra_sink_receive_same_line() {
    let dir = tempdir().unwrap();
    let mut logger = Logger::new(
        LoggerConfig::default()
            .with_directory(dir.path())
            .with_console(false),
    )
    .unwrap();
    let sink = CollectingSink::new();
    let lines = sink.lines.clone();
    logger.add_sink(Arc::new(sink));

    info!(logger, "to both");

    let file_content = fs::read_to_string(dir.path().join("app.log")).unwrap();
    assert_eq!(file_content, lines.lock().unwrap()[0].1);
}
