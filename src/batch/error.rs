use std::path::PathBuf;

use thiserror::Error;

/// Why a whole file was skipped.
#[derive(Error, Debug)]
pub enum FileError {
    #[error("Error reading hand history file")]
    Io(#[from] std::io::Error),

    #[error("Hand history file is not valid UTF-8")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Errors that stop a batch before any hand is parsed.
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("Invalid batch configuration: {0}")]
    ValidationError(String),

    #[error("Error listing hand history files")]
    Io(#[from] std::io::Error),

    #[error("Directory does not exist")]
    MissingDirectory(PathBuf),

    #[error("Failed to build the parsing thread pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
