use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Invalid file name: {0:?}")]
    InvalidFileName(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Script error on line {line}: {message}")]
    Script { line: usize, message: String },
}

/// Convenience type alias for Results with AppError
pub type Result<T> = std::result::Result<T, AppError>;
