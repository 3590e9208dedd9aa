use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReimageError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error at '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    StdIoError(#[from] std::io::Error),

    #[error("Parsing error in '{file}': {message}")]
    ParseError { file: String, message: String },

    #[error(transparent)]
    JsonError(#[from] serde_json::Error),

    #[error("System command '{command}' failed: {reason}")]
    SystemCommandFailed { command: String, reason: String },

    /// Non-zero exit, only raised when the caller asked for it
    #[error("{program} returned an error: {}", exit_code_label(.code))]
    CommandExit {
        program: String,
        code: Option<i32>,
        output: String,
    },

    #[error("Archive verification failed: {0}")]
    ArchiveVerification(String),

    #[error("No handler registered under '{0}'")]
    UnknownHandler(String),

    #[error("Path error: {0}")]
    PathError(String),

    #[error("Operation interrupted by user")]
    Interrupted,
}

pub(crate) fn exit_code_label(code: &Option<i32>) -> String {
    code.map_or_else(|| "terminated by signal".to_string(), |c| c.to_string())
}

pub type Result<T> = std::result::Result<T, ReimageError>;
