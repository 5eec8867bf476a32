use std::sync::Arc;
use std::thread;

use rotlog::{Logger, LoggerConfig};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Surfaces the logger's own diagnostics (rotation failures etc.) on stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let logger = Arc::new(Logger::new(
        LoggerConfig::default()
            .with_level("debug")
            .with_directory("logs")
            .with_file_name("demo.log")
            .with_max_file_size(16 * 1024)
            .with_separate_errors(true),
    )?);

    let workers: Vec<_> = (0..4)
        .map(|worker| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for i in 0..200 {
                    rotlog::debug!(logger, "worker {} step {}", worker, i);
                    if i % 50 == 0 {
                        rotlog::error!(logger, "worker {} hit checkpoint {}", worker, i);
                    }
                }
            })
        })
        .collect();

    for (index, worker) in workers.into_iter().enumerate() {
        if worker.join().is_err() {
            tracing::error!(worker = index, "worker thread panicked");
        }
    }

    if let Some(stats) = logger.file_stats() {
        rotlog::info!(
            logger,
            "wrote {} lines, {} rotations, {} dropped",
            stats.lines_written,
            stats.rotations,
            stats.dropped
        );
    }
    Ok(())
}
