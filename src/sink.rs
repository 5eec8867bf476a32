use std::io::{self, Write};

use crate::level::Severity;

/// A destination for rendered log lines.
///
/// Implementations decide what happens with a line once the logger has
/// gated and rendered it: print it, append it to a file, ship it elsewhere.
/// `emit` has no return value. A sink that fails to write reports the
/// failure itself and carries on, so logging never disturbs the caller.
///
/// # Usage
///
/// ```
/// # use rotlog::{Severity, Sink};
/// # use std::sync::Mutex;
/// // Collects lines in memory
/// struct MemorySink(Mutex<Vec<String>>);
///
/// impl Sink for MemorySink {
///     fn emit(&self, _severity: Severity, line: &str) {
///         self.0.lock().unwrap().push(line.to_string());
///     }
/// }
/// ```
pub trait Sink: Send + Sync {
    /// Writes one already-rendered line, including its trailing newline.
    fn emit(&self, severity: Severity, line: &str);
}

/// Writes every line to standard output.
///
/// Holds no state and takes no lock of its own; the stdout handle
/// serializes whole-line writes.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl Sink for ConsoleSink {
    fn emit(&self, _severity: Severity, line: &str) {
        let mut out = io::stdout().lock();
        if let Err(error) = out.write_all(line.as_bytes()).and_then(|_| out.flush()) {
            tracing::warn!(%error, "failed to write log line to stdout");
        }
    }
}
