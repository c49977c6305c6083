use core::fmt;

use alloc::string::String;

#[derive(Debug)]
pub enum AugmentError {
    InputNotFound(String),
    ReadFailure { path: String, cause: anyhow::Error },
    WriteFailure { path: String, cause: anyhow::Error },
}

impl AugmentError {
    pub(crate) fn read(path: &str, cause: impl Into<anyhow::Error>) -> Self {
        AugmentError::ReadFailure {
            path: path.into(),
            cause: cause.into(),
        }
    }

    pub(crate) fn write(path: &str, cause: impl Into<anyhow::Error>) -> Self {
        AugmentError::WriteFailure {
            path: path.into(),
            cause: cause.into(),
        }
    }
}

impl fmt::Display for AugmentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AugmentError::InputNotFound(path) => write!(f, "Input file '{}' not found", path),
            AugmentError::ReadFailure { path, cause } => {
                write!(f, "Failed to read '{}': {}", path, cause)
            }
            AugmentError::WriteFailure { path, cause } => {
                write!(f, "Failed to write '{}': {}", path, cause)
            }
        }
    }
}

impl core::error::Error for AugmentError {}
