use std::error::Error as StdError;
use std::path::PathBuf;

use thiserror::Error;

/// Mediascribe's crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Mediascribe's crate-wide error type.
///
/// Internal modules work with `anyhow` and attach context as they go; errors are flattened into
/// this type at the public boundary so downstream code isn't forced to adopt `anyhow`.
#[derive(Debug, Error)]
pub enum Error {
    /// The input path does not reference an existing regular file.
    #[error("file not found: {}", .path.display())]
    InputNotFound { path: PathBuf },

    #[error("{0}")]
    Message(String),

    #[error(transparent)]
    Other(#[from] Box<dyn StdError + Send + Sync>),
}

impl Error {
    pub(crate) fn input_not_found(path: impl Into<PathBuf>) -> Self {
        Self::InputNotFound { path: path.into() }
    }

    /// Whether this error was caused by user input rather than a runtime failure.
    pub fn is_user_error(&self) -> bool {
        matches!(self, Self::InputNotFound { .. })
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Message(format!("{err:#}"))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Other(Box::new(err))
    }
}
