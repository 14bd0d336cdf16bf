use crate::error::{FieldError, Result};
use clap::ValueEnum;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _, Layer as _};

/// Env var holding `tracing` filter directives; overrides `--log-level`
const LOG_ENV: &str = "PARTICLE_FIELD_LOG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogLevel {
    #[default]
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn directive(&self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Default log file location
pub fn default_log_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("particle-field")
        .join("particle-field.log")
}

/// Send logs to a file, since the terminal UI owns stdout. Does nothing when the
/// level is `Off` and no filters are set in the environment.
pub fn setup_logging(path: &Path, level: LogLevel) -> Result<bool> {
    let user_filters = std::env::var(LOG_ENV).ok();
    if level == LogLevel::Off && user_filters.is_none() {
        return Ok(false);
    }

    if let Some(directory) = path.parent() {
        std::fs::create_dir_all(directory).map_err(|e| FieldError::io(directory, e))?;
    }
    let file = std::fs::File::create(path).map_err(|e| FieldError::io(path, e))?;

    let filters = match user_filters {
        Some(directives) => tracing_subscriber::EnvFilter::builder()
            .with_default_directive(tracing::level_filters::LevelFilter::ERROR.into())
            .parse_lossy(directives),
        None => tracing_subscriber::EnvFilter::builder()
            .with_default_directive(tracing::level_filters::LevelFilter::OFF.into())
            .parse_lossy("")
            .add_directive(
                format!("particle_field={}", level.directive())
                    .parse()
                    .map_err(|e| FieldError::Log(format!("{e}")))?,
            ),
    };

    let logfile_layer = tracing_subscriber::fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_filter(filters);

    tracing_subscriber::registry()
        .with(logfile_layer)
        .try_init()
        .map_err(|e| FieldError::Log(e.to_string()))?;

    Ok(true)
}
