use log::LevelFilter;
use log4rs::Handle;
use log4rs::append::console::ConsoleAppender;
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use thiserror::Error;

const LOG_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} {l:<5} {M} - {m}{n}";

/// Sets up log4rs logging to file and optionally to stdout
///
/// # Arguments
///
/// * 'log_path' - path to the log file
/// * 'log_level' - the max level to log
/// * 'log_to_stdout' - whether to log to stdout as well
pub fn setup_logger(log_path: &str, log_level: LevelFilter, log_to_stdout: bool) -> Result<Handle, LoggerError> {
    let file = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build(log_path)
        .map_err(|e| LoggerError(format!("log file {}: {}", log_path, e)))?;

    let mut builder = Config::builder()
        .appender(Appender::builder().build("file", Box::new(file)));
    let mut root = Root::builder().appender("file");

    if log_to_stdout {
        let stdout = ConsoleAppender::builder()
            .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
            .build();
        builder = builder.appender(Appender::builder().build("stdout", Box::new(stdout)));
        root = root.appender("stdout");
    }

    let config = builder
        .build(root.build(log_level))
        .map_err(|e| LoggerError(e.to_string()))?;

    let handle = log4rs::init_config(config)
        .map_err(|e| LoggerError(e.to_string()))?;

    Ok(handle)
}

/// Error depicting errors that occur while setting up the logger
///
#[derive(Debug, Error)]
#[error("LoggerError: {0}")]
pub struct LoggerError(pub String);
