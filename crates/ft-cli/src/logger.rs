use crate::error::{CliError, Result as CliErrorResult};

use std::fmt::{Arguments, Display};
use std::path::PathBuf;
use std::time::SystemTime;

use fern::Dispatch;
use fern::colors::{Color, ColoredLevelConfig};
use log::{LevelFilter, Record, debug};

/// Initialize logger with fern
///
/// Log lines go to stderr (or a file) so stdout carries only command output.
/// The file sink always records `[file:line]`; the console only does so at
/// debug level and below.
///
/// # Arguments
/// * `log_level` - Log level filter
/// * `log_file` - Optional path to log file. None = stderr, Some = file output
/// * `colored` - Enable colored output (ignored when logging to file)
pub fn initialize(
    log_level: ft_config::LogLevel,
    log_file: Option<PathBuf>,
    colored: bool,
) -> CliErrorResult<()> {
    let level_filter = log_level.0;
    let console_location = shows_source_location(level_filter);

    let base_dispatch = Dispatch::new().level(level_filter);

    let dispatch = if let Some(ref log_path) = log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)
            .map_err(|e| CliError::Logger {
                message: format!("Failed to open log file {}: {}", log_path.display(), e),
            })?;

        Dispatch::new()
            .format(|out, message, record| {
                let date = humantime::format_rfc3339(SystemTime::now());
                out.finish(format_args!(
                    "{}",
                    format_line(date, record.level(), message, source_location(record))
                ))
            })
            .chain(file)
    } else if colored {
        let colors = ColoredLevelConfig::new()
            .trace(Color::Magenta)
            .debug(Color::Blue)
            .info(Color::Green)
            .warn(Color::Yellow)
            .error(Color::Red);

        Dispatch::new()
            .format(move |out, message, record| {
                let date = humantime::format_rfc3339_seconds(SystemTime::now());
                let location = console_location.then(|| source_location(record)).flatten();
                out.finish(format_args!(
                    "{}",
                    format_line(date, colors.color(record.level()), message, location)
                ))
            })
            .chain(std::io::stderr())
    } else {
        Dispatch::new()
            .format(move |out, message, record| {
                let date = humantime::format_rfc3339_seconds(SystemTime::now());
                let location = console_location.then(|| source_location(record)).flatten();
                out.finish(format_args!(
                    "{}",
                    format_line(date, record.level(), message, location)
                ))
            })
            .chain(std::io::stderr())
    };

    base_dispatch
        .chain(dispatch)
        .apply()
        .map_err(|e| CliError::Logger {
            message: format!("Failed to initialize logger: {e}"),
        })?;

    match log_file {
        Some(ref path) => debug!(
            "Logger initialized: level={:?}, file={}",
            level_filter,
            path.display()
        ),
        None => debug!("Logger initialized: level={:?}, stderr", level_filter),
    }

    Ok(())
}

/// `[date - level] message`, followed by `[file:line]` when a location is given.
pub(crate) fn format_line(
    date: impl Display,
    level: impl Display,
    message: &Arguments<'_>,
    location: Option<(&str, u32)>,
) -> String {
    match location {
        Some((file, line)) => format!("[{date} - {level}] {message} [{file}:{line}]"),
        None => format!("[{date} - {level}] {message}"),
    }
}

/// Console lines carry the source location only when debugging.
pub(crate) fn shows_source_location(level: LevelFilter) -> bool {
    level >= LevelFilter::Debug
}

fn source_location<'a>(record: &'a Record<'_>) -> Option<(&'a str, u32)> {
    Some((record.file().unwrap_or("unknown"), record.line().unwrap_or(0)))
}
