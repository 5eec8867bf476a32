use std::fmt;

use chrono::{DateTime, Local};

use crate::callsite::CallSite;
use crate::clock::DATE_FORMAT;
use crate::error::ConfigError;
use crate::level::Severity;

/// Named line layouts.
///
/// * `simple`: `<timestamp> - [<LEVEL>] - <message>\n`
/// * `standard`: `<timestamp> - [PID-<pid>] - [Thread-<tid>] - [<LEVEL>] - <message> - <func> - [Line-<n>] - <file>\n`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    Simple,
    Standard,
}

impl Template {
    pub fn from_name(name: &str) -> Result<Template, ConfigError> {
        match name {
            "simple" => Ok(Template::Simple),
            "standard" => Ok(Template::Standard),
            other => Err(ConfigError::UnsupportedTemplate(other.to_string())),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Template::Simple => "simple",
            Template::Standard => "standard",
        }
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One log call, fully resolved and ready to render.
///
/// Built fresh per call and never stored; only its rendered text outlives it.
#[derive(Debug, Clone)]
pub struct LogRecord<'a> {
    pub time: DateTime<Local>,
    pub message: String,
    pub severity: Severity,
    pub site: CallSite<'a>,
    pub process_id: u32,
    pub thread_id: u64,
}

/// Renders `record` as a single newline-terminated line.
///
/// Pure: the same record and template always give the same bytes.
pub fn render(template: Template, record: &LogRecord<'_>) -> String {
    let time = record.time.format(DATE_FORMAT);
    match template {
        Template::Simple => format!(
            "{} - [{}] - {}\n",
            time, record.severity, record.message
        ),
        Template::Standard => format!(
            "{} - [PID-{}] - [Thread-{}] - [{}] - {} - {} - [Line-{}] - {}\n",
            time,
            record.process_id,
            record.thread_id,
            record.severity,
            record.message,
            record.site.function,
            record.site.line,
            record.site.file,
        ),
    }
}
