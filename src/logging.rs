/*
 * Logger setup for the binary. Log output always goes to stderr so it never
 * mixes with search output; `--log-file` adds a debug-level copy on disk.
 */
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, SharedLogger, TermLogger,
    TerminalMode, WriteLogger,
};
use std::fs::File;
use std::io;
use std::path::Path;

#[derive(Debug)]
pub enum LoggingError {
    Io(io::Error),
    SetLogger(log::SetLoggerError),
}

impl From<io::Error> for LoggingError {
    fn from(err: io::Error) -> Self {
        LoggingError::Io(err)
    }
}

impl From<log::SetLoggerError> for LoggingError {
    fn from(err: log::SetLoggerError) -> Self {
        LoggingError::SetLogger(err)
    }
}

impl std::fmt::Display for LoggingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoggingError::Io(e) => write!(f, "Could not open log file: {e}"),
            LoggingError::SetLogger(e) => write!(f, "Logger already initialized: {e}"),
        }
    }
}

impl std::error::Error for LoggingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoggingError::Io(e) => Some(e),
            LoggingError::SetLogger(e) => Some(e),
        }
    }
}

pub fn level_for_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

pub fn init(verbosity: u8, log_file: Option<&Path>) -> Result<(), LoggingError> {
    let config = ConfigBuilder::new()
        .set_thread_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level_for_verbosity(verbosity),
        config.clone(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];
    if let Some(path) = log_file {
        let file = File::create(path)?;
        loggers.push(WriteLogger::new(LevelFilter::Debug, config, file));
    }

    CombinedLogger::init(loggers)?;
    log::debug!("Logging: Initialized (verbosity {verbosity}, file {log_file:?}).");
    Ok(())
}
