//! Logging Infrastructure
//!
//! Structured logging setup with support for both development and production environments.

use std::path::Path;

use tracing_subscriber::EnvFilter;

/// Initialize the logger
///
/// Respects `RUST_LOG` for filtering (default `info`). When `LOG_DIR` points
/// at an existing directory, output additionally rolls into daily files there.
pub fn init_logger() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    if let Ok(dir) = std::env::var("LOG_DIR") {
        let log_path = Path::new(&dir);
        if log_path.exists() {
            let file_appender = tracing_appender::rolling::daily(&dir, "photohunt-server");
            subscriber.with_writer(file_appender).init();
            return;
        }
    }

    subscriber.init();
}
