//! File-based logging setup.
//!
//! The core is embedded in a client whose UI owns the terminal, so logs go
//! to a rotating file rather than stdout. Host applications call
//! [`init_logging`] once at startup; level control comes from `RUST_LOG`.

use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

const LOG_DIR: &str = ".logs";
const LOG_FILE_PREFIX: &str = "brainbox";

/// Initialize the logging system.
///
/// Logs are written to `.logs/brainbox.YYYY-MM-DD.log` with daily rotation.
/// Default level is DEBUG for this crate and WARN for everything else.
pub fn init_logging() -> anyhow::Result<()> {
    let log_dir = Path::new(LOG_DIR);
    if !log_dir.exists() {
        std::fs::create_dir_all(log_dir)?;
    }

    let file_appender = RollingFileAppender::new(Rotation::DAILY, LOG_DIR, LOG_FILE_PREFIX);

    // Non-blocking writer so logging never stalls the async runtime; the
    // guard must outlive the application.
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    Box::leak(Box::new(guard));

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("brainbox=debug,warn"));

    let fmt_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();

    tracing::info!("Logging initialized - logs written to {}/", LOG_DIR);

    Ok(())
}
