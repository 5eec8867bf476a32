//! # rotlog
//!
//! An in-process text logger with size-based file rotation.
//!
//! * **Level gating**: records below the configured minimum cost nothing,
//!   not even formatting
//! * **Fixed layouts**: `simple` and `standard` templates rendered one line
//!   per record
//! * **Rotating files**: a main log plus an optional `.err` mirror for
//!   `ERROR` and above, each rotated to `<file>.bak<timestamp>` when full
//! * **Thread safe**: one lock per file sink covers the whole
//!   check-rotate-write step
//!
//! ## Main Components
//!
//! * `Logger`: level gate, renderer and fan-out to sinks
//! * `RotatingFileSink`: the rotating main/error file pair
//! * `ConsoleSink`: plain stdout output
//! * `Sink`: the trait any output implements
//!
//! ## Quick Start
//!
//! ```
//! use rotlog::{Logger, LoggerConfig};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let logger = Logger::new(
//!     LoggerConfig::default()
//!         .with_level("debug")
//!         .with_directory(dir.path())
//!         .with_file_name("service.log")
//!         .with_max_file_size(1024 * 1024)
//!         .with_separate_errors(true)
//!         .with_console(false),
//! )
//! .unwrap();
//!
//! rotlog::info!(logger, "listening on port {}", 8080);
//! rotlog::error!(logger, "upstream timed out after {} ms", 250);
//! ```
//!
//! Internal I/O failures never reach the caller. They are reported as
//! `tracing` events and counted in [`SinkStats`].

pub mod callsite;
pub mod clock;
pub mod error;
pub mod level;
pub mod logger;
pub mod rotating_file;
pub mod sink;
pub mod template;

pub use callsite::CallSite;
pub use error::ConfigError;
pub use level::{level_to_string, parse_level, ParseLevelError, Severity};
pub use logger::{Logger, LoggerConfig};
pub use rotating_file::{RotatingFileSink, SinkStats};
pub use sink::{ConsoleSink, Sink};
pub use template::{render, LogRecord, Template};
