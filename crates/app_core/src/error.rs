//! Shell error types

use thiserror::Error;

/// Main shell error type
#[derive(Error, Debug)]
pub enum AppError {
    // ===== Command errors (report, keep the session) =====
    #[error("No such file or directory: {0}")]
    NotFound(String),

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error("Is a directory: {0}")]
    NotAFile(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("{0}")]
    MalformedCommand(String),

    #[error("Archive error: {0}")]
    Archive(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // ===== Startup errors (terminate) =====
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Initialization failed: {0}")]
    Init(String),
}

impl AppError {
    /// Can the session continue after this error?
    pub fn is_recoverable(&self) -> bool {
        !self.is_fatal()
    }

    /// Is this a startup error?
    pub fn is_fatal(&self) -> bool {
        matches!(self, AppError::Config(_) | AppError::Init(_))
    }

    /// Get a user-facing message prefixed with the command name
    pub fn user_message(&self, command: &str) -> String {
        match self {
            AppError::NotFound(path) => format!("{}: {}: No such file or directory", command, path),
            AppError::NotADirectory(path) => format!("{}: {}: Not a directory", command, path),
            AppError::NotAFile(path) => format!("{}: {}: Is a directory", command, path),
            AppError::MalformedCommand(usage) => usage.clone(),
            _ => format!("{}: {}", command, self),
        }
    }
}

impl From<app_fs::FsError> for AppError {
    fn from(e: app_fs::FsError) -> Self {
        match e {
            app_fs::FsError::NotFound(p) => AppError::NotFound(p),
            app_fs::FsError::NotADirectory(p) => AppError::NotADirectory(p),
            app_fs::FsError::NotAFile(p) => AppError::NotAFile(p),
            app_fs::FsError::InvalidOperation(msg) => AppError::InvalidOperation(msg),
            app_fs::FsError::Archive(msg) => AppError::Archive(msg),
            app_fs::FsError::Io(e) => AppError::Io(e),
        }
    }
}

impl From<toml::de::Error> for AppError {
    fn from(e: toml::de::Error) -> Self {
        AppError::Config(e.to_string())
    }
}
