//! Process-wide logging for the annotation store.
//!
//! # Responsibility
//! - Start rolling file logs once per process from a `LoggingConfig`.
//! - Optionally mirror warnings (unsaved slots, corrupt payloads) to stderr.
//!
//! # Invariants
//! - Repeating `init_logging` with an equal config is a no-op.
//! - Any other config after init is rejected with the active one attached.
//! - Annotation text is never written to logs; events carry keys, ids and
//!   sizes only.

use crate::config::{ConfigError, LogLevel, LoggingConfig};
use flexi_logger::{
    Cleanup, Criterion, Duplicate, FileSpec, FlexiLoggerError, LogSpecification, Logger,
    LoggerHandle, Naming, WriteMode,
};
use log::info;
use once_cell::sync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};

const LOG_FILE_BASENAME: &str = "readmark";
const ROTATE_AT_BYTES: u64 = 10 * 1024 * 1024;
const KEEP_LOG_FILES: usize = 5;

static ACTIVE_LOGGER: OnceCell<ActiveLogger> = OnceCell::new();

struct ActiveLogger {
    config: LoggingConfig,
    _handle: LoggerHandle,
}

/// Logging bootstrap failure.
#[derive(Debug)]
pub enum LoggingError {
    Config(ConfigError),
    /// Logging is already running with `active`.
    AlreadyActive { active: LoggingConfig },
    CreateDir(std::io::Error),
    Backend(FlexiLoggerError),
}

impl Display for LoggingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::AlreadyActive { active } => write!(
                f,
                "logging already active at `{}` with level `{}`; refusing to reconfigure",
                active.log_dir.display(),
                active.level.as_str()
            ),
            Self::CreateDir(err) => write!(f, "failed to create log directory: {err}"),
            Self::Backend(err) => write!(f, "failed to start logger: {err}"),
        }
    }
}

impl Error for LoggingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::AlreadyActive { .. } => None,
            Self::CreateDir(err) => Some(err),
            Self::Backend(err) => Some(err),
        }
    }
}

impl From<ConfigError> for LoggingError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<FlexiLoggerError> for LoggingError {
    fn from(value: FlexiLoggerError) -> Self {
        Self::Backend(value)
    }
}

/// Starts file logging described by `config`.
///
/// # Errors
/// - `config` fails validation (relative directory).
/// - Logging already runs with a different config.
/// - The directory cannot be created or the backend fails to start.
pub fn init_logging(config: &LoggingConfig) -> Result<(), LoggingError> {
    config.validate()?;

    let active = ACTIVE_LOGGER.get_or_try_init(|| start_logger(config))?;
    // Covers both a repeat call and losing the init race to another config.
    if active.config != *config {
        return Err(LoggingError::AlreadyActive {
            active: active.config.clone(),
        });
    }
    Ok(())
}

/// Config of the running logger, or `None` before `init_logging` succeeds.
pub fn logging_status() -> Option<LoggingConfig> {
    ACTIVE_LOGGER.get().map(|active| active.config.clone())
}

/// Build-mode default level.
pub fn default_log_level() -> LogLevel {
    LogLevel::for_build()
}

fn start_logger(config: &LoggingConfig) -> Result<ActiveLogger, LoggingError> {
    std::fs::create_dir_all(&config.log_dir).map_err(LoggingError::CreateDir)?;

    let duplicate = if config.mirror_warnings_to_stderr {
        Duplicate::Warn
    } else {
        Duplicate::None
    };
    let handle = Logger::with(LogSpecification::parse(config.level.as_str())?)
        .log_to_file(
            FileSpec::default()
                .directory(config.log_dir.as_path())
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(ROTATE_AT_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(KEEP_LOG_FILES),
        )
        .duplicate_to_stderr(duplicate)
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()?;

    info!(
        "event=logging_init module=core status=ok level={} log_dir={} stderr_warnings={} version={}",
        config.level.as_str(),
        config.log_dir.display(),
        config.mirror_warnings_to_stderr,
        env!("CARGO_PKG_VERSION")
    );

    Ok(ActiveLogger {
        config: config.clone(),
        _handle: handle,
    })
}
