//! # Logger
//!
//! Installs the global `tracing` subscriber for census tools.
//!
//! Console output goes to stderr so that a tool's stdout stays machine-readable.
//! An optional rolling log file is written through a non-blocking worker, as
//! plain text or JSON lines. `RUST_LOG` directives are honoured on top of the
//! configured level.
//!
//! ## Example
//!
//! ```rust
//! use census_logger::{LevelFilter, Logger};
//!
//! let _logger = Logger::builder("census-loader")
//!     .level(LevelFilter::DEBUG)
//!     .init()
//!     .unwrap();
//! ```

mod error;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use std::fs;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const DEFAULT_MAX_FILES: usize = 10;
const LOG_FILE_SUFFIX: &str = "log";

/// Rolling log file settings.
#[derive(Debug)]
struct FileOutput {
    dir: PathBuf,
    rotation: Rotation,
    max_files: usize,
    json: bool,
}

/// A builder for configuring and initializing the global tracing subscriber.
#[must_use = "builders do nothing unless you call .init()"]
#[derive(Debug)]
pub struct LoggerBuilder {
    name: String,
    console: bool,
    level: LevelFilter,
    directives: Option<String>,
    file: Option<FileOutput>,
}

impl LoggerBuilder {
    /// Sets the minimum level emitted when no directive says otherwise.
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    /// Maps a repeat count of a `--verbose` flag to a level: none is `INFO`, one
    /// is `DEBUG`, more is `TRACE`.
    pub const fn verbosity(self, count: u8) -> Self {
        let level = match count {
            0 => LevelFilter::INFO,
            1 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        };
        self.level(level)
    }

    /// Adds filter directives (e.g., `census_loader=debug,reqwest=warn`).
    ///
    /// Invalid directives make [`LoggerBuilder::init`] fail.
    pub fn directives(mut self, directives: impl Into<String>) -> Self {
        self.directives = Some(directives.into());
        self
    }

    /// Enables or disables the stderr console layer.
    pub const fn console(mut self, enabled: bool) -> Self {
        self.console = enabled;
        self
    }

    /// Also writes to rolling files `<name>.<date>.log` in `dir`.
    pub fn file(mut self, dir: impl Into<PathBuf>) -> Self {
        self.file = Some(FileOutput {
            dir: dir.into(),
            rotation: Rotation::DAILY,
            max_files: DEFAULT_MAX_FILES,
            json: false,
        });
        self
    }

    /// Rotation of the log file. No effect without [`LoggerBuilder::file`].
    pub fn rotation(mut self, rotation: Rotation) -> Self {
        if let Some(file) = &mut self.file {
            file.rotation = rotation;
        }
        self
    }

    /// Number of rotated log files kept. No effect without [`LoggerBuilder::file`].
    pub const fn max_files(mut self, max: usize) -> Self {
        if let Some(file) = &mut self.file {
            file.max_files = max;
        }
        self
    }

    /// Writes the log file as JSON lines. No effect without [`LoggerBuilder::file`].
    pub const fn json(mut self, enabled: bool) -> Self {
        if let Some(file) = &mut self.file {
            file.json = enabled;
        }
        self
    }

    /// Consumes the builder and installs the global tracing subscriber.
    ///
    /// Keep the returned [`Logger`] alive until shutdown: it owns the worker
    /// that flushes the log file.
    ///
    /// # Errors
    /// Returns [`LoggerError::InvalidConfiguration`] for invalid builder settings,
    /// [`LoggerError::Io`] or [`LoggerError::Appender`] if the log file cannot be
    /// set up, and [`LoggerError::Subscriber`] if a global subscriber already exists.
    pub fn init(self) -> Result<Logger, LoggerError> {
        self.validate()?;
        let env_filter = self.env_filter()?;

        let mut layers = Vec::new();
        if self.console {
            let ansi = std::io::stderr().is_terminal();
            layers.push(layer().compact().with_writer(std::io::stderr).with_ansi(ansi).boxed());
        }

        let guard = match self.file {
            Some(file) => {
                fs::create_dir_all(&file.dir).context(file.dir.display().to_string())?;

                let appender = RollingFileAppender::builder()
                    .rotation(file.rotation)
                    .filename_prefix(&self.name)
                    .filename_suffix(LOG_FILE_SUFFIX)
                    .max_log_files(file.max_files)
                    .build(&file.dir)?;
                let (writer, guard) = tracing_appender::non_blocking(appender);

                let file_layer = layer().with_writer(writer).with_ansi(false);
                layers.push(if file.json { file_layer.json().boxed() } else { file_layer.boxed() });
                Some(guard)
            },
            None => None,
        };

        if layers.is_empty() {
            return Err(LoggerError::InvalidConfiguration {
                message: "no output enabled; enable the console or a log file".into(),
                context: None,
            });
        }

        tracing_subscriber::registry().with(env_filter).with(layers).try_init()?;

        Ok(Logger { guard })
    }

    fn validate(&self) -> Result<(), LoggerError> {
        if self.name.trim().is_empty() {
            return Err(LoggerError::InvalidConfiguration {
                message: "logger name cannot be empty".into(),
                context: None,
            });
        }
        if self.file.as_ref().is_some_and(|file| file.max_files == 0) {
            return Err(LoggerError::InvalidConfiguration {
                message: "max_files must be greater than zero".into(),
                context: None,
            });
        }
        Ok(())
    }

    fn env_filter(&self) -> Result<EnvFilter, LoggerError> {
        let builder = EnvFilter::builder().with_default_directive(self.level.into());
        self.directives.as_ref().map_or_else(
            || Ok(builder.from_env_lossy()),
            |directives| {
                builder.parse(directives).map_err(|e| LoggerError::InvalidConfiguration {
                    message: format!("invalid directives '{directives}': {e}").into(),
                    context: None,
                })
            },
        )
    }
}

/// A handle to the installed logging system.
#[must_use = "dropping this handle stops the log file worker"]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    /// Returns a [`LoggerBuilder`] for a tool called `name`.
    ///
    /// The name prefixes rolling log files (e.g., `census-loader.2026-10-16.log`).
    pub fn builder(name: impl Into<String>) -> LoggerBuilder {
        LoggerBuilder {
            name: name.into(),
            console: true,
            level: LevelFilter::INFO,
            directives: None,
            file: None,
        }
    }

    /// Whether a log file worker is attached.
    #[must_use]
    pub const fn has_file(&self) -> bool {
        self.guard.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_console_at_info() {
        let builder = Logger::builder("census-loader");
        assert!(builder.console);
        assert_eq!(builder.level, LevelFilter::INFO);
        assert!(builder.file.is_none());
    }

    #[test]
    fn verbosity_raises_the_level() {
        assert_eq!(Logger::builder("t").verbosity(1).level, LevelFilter::DEBUG);
        assert_eq!(Logger::builder("t").verbosity(3).level, LevelFilter::TRACE);
    }

    #[test]
    fn file_settings_need_a_file() {
        let builder = Logger::builder("t").json(true).max_files(3);
        assert!(builder.file.is_none());

        let builder = Logger::builder("t").file("logs").json(true).max_files(3);
        let file = builder.file.as_ref().unwrap();
        assert!(file.json);
        assert_eq!(file.max_files, 3);
    }

    #[test]
    fn invalid_settings_fail_before_install() {
        let err = Logger::builder(" ").init().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));

        let err = Logger::builder("t").console(false).init().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));

        let err = Logger::builder("t").directives("census=notalevel").init().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));

        let err = Logger::builder("t").file("logs").max_files(0).init().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }
}
