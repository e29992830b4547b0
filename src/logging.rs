use clap::ValueEnum;
use color_eyre::Result;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

lazy_static::lazy_static! {
    pub static ref LOG_FILE: String = format!("{}.log", env!("CARGO_PKG_NAME"));
}

/// Levels accepted by `--logging`
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

/// Initialize file logging; the terminal belongs to the TUI so nothing is
/// written to stdout or stderr
pub fn init_with(
    custom_log_path: Option<std::path::PathBuf>,
    level: Option<tracing::Level>,
) -> Result<()> {
    let log_path = if let Some(path) = custom_log_path {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        path
    } else {
        let cwd = std::env::current_dir()?;
        cwd.join(LOG_FILE.clone())
    };

    let env_filter = level_filter(level);

    // Open once up front so a bad path fails here instead of inside the writer
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    let file_subscriber = fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::sync::Mutex::new(log_file))
        .with_target(false)
        .with_ansi(false)
        .with_filter(env_filter);

    tracing_subscriber::registry()
        .with(file_subscriber)
        .with(ErrorLayer::default())
        .try_init()?;

    Ok(())
}

/// An explicit level wins; otherwise RUST_LOG, falling back to WARN
fn level_filter(level: Option<tracing::Level>) -> EnvFilter {
    match level {
        Some(level) => EnvFilter::new(level.as_str()),
        None => EnvFilter::builder()
            .with_default_directive(tracing::Level::WARN.into())
            .from_env_lossy(),
    }
}
