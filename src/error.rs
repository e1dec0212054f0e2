use std::io;
use std::path::PathBuf;

/// Errors that abort a declaration run.
///
/// Best-effort failures (odd statements, unresolved type names) never reach this
/// type; they are skipped or logged where they happen.
#[derive(Debug, thiserror::Error)]
pub enum DtsError {
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid package manifest {}: {message}", .path.display())]
    Manifest { path: PathBuf, message: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    /// The declaration emitter could not produce declarations for a file.
    #[error("declaration emit failed for {file}: {message}")]
    Emit { file: String, message: String },

    #[error("failed to parse markup of {file}: {message}")]
    Template { file: String, message: String },
}

impl DtsError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        DtsError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn emit(file: impl Into<String>, message: impl Into<String>) -> Self {
        DtsError::Emit {
            file: file.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DtsError>;
