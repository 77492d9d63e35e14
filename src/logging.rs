//! Tracing setup: human-readable stderr output plus an optional JSON log file

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer, filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::result::{AppError, Result};

/// Directory for daily-rolling JSON logs; file logging is off when unset
pub const LOG_DIR_ENV: &str = "OCTOLENS_LOG_DIR";

const LOG_FILE_PREFIX: &str = "octolens.log";

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Default stderr level; `RUST_LOG` directives take precedence
    pub console_level: LevelFilter,
    pub file_level: LevelFilter,
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            console_level: LevelFilter::WARN,
            file_level: LevelFilter::DEBUG,
            log_dir: None,
        }
    }
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        Self {
            log_dir: std::env::var_os(LOG_DIR_ENV)
                .filter(|dir| !dir.is_empty())
                .map(PathBuf::from),
            ..Self::default()
        }
    }

    /// Map a `-v` count onto the stderr level
    pub fn with_verbosity(mut self, verbose: u8) -> Self {
        self.console_level = match verbose {
            0 => self.console_level,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        };
        self
    }

    /// Apply a level name from the config file to both outputs
    ///
    /// `off` also disables the log file. Apply before [`Self::with_verbosity`]
    /// so an explicit `-v` still raises the stderr level.
    pub fn with_level_name(mut self, level: Option<&str>) -> Self {
        if let Some(level) = level.and_then(|level| level.parse::<LevelFilter>().ok()) {
            self.console_level = level;
            self.file_level = level;
            if level == LevelFilter::OFF {
                self.log_dir = None;
            }
        }
        self
    }
}

/// Install the global subscriber; keep the guard alive until exit so file logs flush
pub fn init_logging(config: LoggingConfig) -> Result<Option<WorkerGuard>> {
    let console_filter = EnvFilter::builder()
        .with_default_directive(config.console_level.into())
        .from_env_lossy();
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(console_filter);

    let (file_layer, guard) = match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .json()
                .with_writer(writer)
                .with_filter(config.file_level);
            (Some(layer), Some(guard))
        },
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| AppError::GeneralError(format!("Failed to initialize logging: {e}").into()))?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_raises_console_level() {
        assert_eq!(LoggingConfig::default().with_verbosity(0).console_level, LevelFilter::WARN);
        assert_eq!(LoggingConfig::default().with_verbosity(1).console_level, LevelFilter::INFO);
        assert_eq!(LoggingConfig::default().with_verbosity(5).console_level, LevelFilter::TRACE);
    }

    #[test]
    fn off_disables_file_logging() {
        let config = LoggingConfig {
            log_dir: Some(PathBuf::from("logs")),
            ..LoggingConfig::default()
        }
        .with_level_name(Some("Off"));
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn level_name_sets_both_levels() {
        let config = LoggingConfig::default().with_level_name(Some("debug")).with_verbosity(0);
        assert_eq!(config.console_level, LevelFilter::DEBUG);
        assert_eq!(config.file_level, LevelFilter::DEBUG);
    }

    #[test]
    fn off_quiets_the_console() {
        let config = LoggingConfig::default().with_level_name(Some("off"));
        assert_eq!(config.console_level, LevelFilter::OFF);
    }

    #[test]
    fn verbosity_wins_over_level_name() {
        let config = LoggingConfig::default().with_level_name(Some("error")).with_verbosity(2);
        assert_eq!(config.console_level, LevelFilter::DEBUG);
        assert_eq!(config.file_level, LevelFilter::ERROR);
    }

    #[test]
    fn unknown_level_name_is_ignored() {
        let config = LoggingConfig::default().with_level_name(Some("loud"));
        assert_eq!(config.console_level, LevelFilter::WARN);
    }
}
