//! Annotation store configuration.
//!
//! # Responsibility
//! - Name the persisted slot per annotation kind.
//! - Carry defaults applied at record creation.
//! - Describe where and how verbosely the store logs.
//!
//! # Invariants
//! - Slot keys are non-blank and pairwise distinct.
//! - The default highlight color is non-blank.
//! - The log directory is absolute.

use crate::model::highlight::DEFAULT_HIGHLIGHT_COLOR;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_BOOKMARKS_KEY: &str = "reader_bookmarks";
pub const DEFAULT_HIGHLIGHTS_KEY: &str = "reader_highlights";
pub const DEFAULT_NOTES_KEY: &str = "reader_notes";

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    BlankSlotKey(&'static str),
    DuplicateSlotKey(String),
    BlankHighlightColor,
    UnknownLogLevel(String),
    RelativeLogDir(PathBuf),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankSlotKey(field) => write!(f, "slot key `{field}` cannot be blank"),
            Self::DuplicateSlotKey(key) => {
                write!(f, "slot key `{key}` is used by more than one annotation kind")
            }
            Self::BlankHighlightColor => write!(f, "default highlight color cannot be blank"),
            Self::UnknownLogLevel(value) => write!(
                f,
                "unsupported log level `{value}`; expected trace|debug|info|warn|error"
            ),
            Self::RelativeLogDir(path) => {
                write!(f, "log_dir must be an absolute path, got `{}`", path.display())
            }
        }
    }
}

impl Error for ConfigError {}

/// Store-wide settings. Missing fields fall back to defaults on deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationConfig {
    pub bookmarks_key: String,
    pub highlights_key: String,
    pub notes_key: String,
    pub default_highlight_color: String,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            bookmarks_key: DEFAULT_BOOKMARKS_KEY.to_string(),
            highlights_key: DEFAULT_HIGHLIGHTS_KEY.to_string(),
            notes_key: DEFAULT_NOTES_KEY.to_string(),
            default_highlight_color: DEFAULT_HIGHLIGHT_COLOR.to_string(),
        }
    }
}

impl AnnotationConfig {
    /// Checks config invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let keys = [
            ("bookmarks_key", self.bookmarks_key.as_str()),
            ("highlights_key", self.highlights_key.as_str()),
            ("notes_key", self.notes_key.as_str()),
        ];
        for (field, key) in keys {
            if key.trim().is_empty() {
                return Err(ConfigError::BlankSlotKey(field));
            }
        }
        for (idx, (_, key)) in keys.iter().enumerate() {
            if keys[idx + 1..].iter().any(|(_, other)| other == key) {
                return Err(ConfigError::DuplicateSlotKey((*key).to_string()));
            }
        }
        if self.default_highlight_color.trim().is_empty() {
            return Err(ConfigError::BlankHighlightColor);
        }
        Ok(())
    }
}

/// Log verbosity accepted by `init_logging`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[serde(alias = "warning")]
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// `debug` for debug builds, `info` for release builds.
    pub fn for_build() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Info
        }
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(ConfigError::UnknownLogLevel(value.to_string())),
        }
    }
}

/// Rolling file log settings for the annotation store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub log_dir: PathBuf,
    /// Also print warnings (e.g. unsaved annotation slots) to stderr.
    #[serde(default)]
    pub mirror_warnings_to_stderr: bool,
}

impl LoggingConfig {
    /// File logging under `log_dir` at the build-mode default level.
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            level: LogLevel::for_build(),
            log_dir: log_dir.into(),
            mirror_warnings_to_stderr: false,
        }
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.log_dir.is_absolute() {
            return Err(ConfigError::RelativeLogDir(self.log_dir.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{AnnotationConfig, ConfigError, LogLevel, LoggingConfig};
    use std::path::PathBuf;

    #[test]
    fn log_level_parses_aliases_and_case() {
        assert_eq!(" WARNING ".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("Trace".parse::<LogLevel>().unwrap(), LogLevel::Trace);
        assert_eq!(
            "verbose".parse::<LogLevel>().unwrap_err(),
            ConfigError::UnknownLogLevel("verbose".to_string())
        );
    }

    #[test]
    fn logging_config_deserializes_with_level_alias() {
        let config: LoggingConfig =
            serde_json::from_str(r#"{"level":"warning","log_dir":"/var/log/readmark"}"#).unwrap();
        assert_eq!(config.level, LogLevel::Warn);
        assert!(!config.mirror_warnings_to_stderr);
        config.validate().unwrap();
    }

    #[test]
    fn logging_config_rejects_relative_dir() {
        let config = LoggingConfig::new("logs/reader");
        assert_eq!(
            config.validate().unwrap_err(),
            ConfigError::RelativeLogDir(PathBuf::from("logs/reader"))
        );
    }

    #[test]
    fn default_config_is_valid() {
        AnnotationConfig::default()
            .validate()
            .expect("defaults should validate");
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: AnnotationConfig =
            serde_json::from_str(r#"{"notes_key":"parent_notes"}"#).unwrap();
        assert_eq!(config.notes_key, "parent_notes");
        assert_eq!(config.bookmarks_key, "reader_bookmarks");
        assert_eq!(config.default_highlight_color, "yellow");
    }

    #[test]
    fn rejects_blank_and_duplicate_keys() {
        let mut config = AnnotationConfig {
            highlights_key: "  ".to_string(),
            ..AnnotationConfig::default()
        };
        assert_eq!(
            config.validate().unwrap_err(),
            ConfigError::BlankSlotKey("highlights_key")
        );

        config.highlights_key = config.notes_key.clone();
        assert_eq!(
            config.validate().unwrap_err(),
            ConfigError::DuplicateSlotKey("reader_notes".to_string())
        );
    }

    #[test]
    fn rejects_blank_color() {
        let config = AnnotationConfig {
            default_highlight_color: String::new(),
            ..AnnotationConfig::default()
        };
        assert_eq!(
            config.validate().unwrap_err(),
            ConfigError::BlankHighlightColor
        );
    }
}
