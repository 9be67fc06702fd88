use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using the library's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the docpack library.
#[derive(Error, Debug, Clone)]
#[non_exhaustive]
pub enum Error {
    /// IO error with context about the file path.
    #[error("IO error accessing '{path}': {message}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// Configuration validation error.
    #[error("Invalid configuration: {message}")]
    Config {
        /// Detailed error message
        message: String,
    },

    /// A batching policy argument that is neither a positive integer nor `folder`.
    #[error("Unknown batching policy '{value}': expected a positive word count or 'folder'")]
    InvalidPolicy {
        /// The rejected argument
        value: String,
    },

    /// A required command-line argument was not supplied.
    #[error("Missing required argument: {name}")]
    MissingArgument {
        /// Name of the missing argument
        name: String,
    },

    /// Invalid UTF-8 encountered in a source file.
    #[error("Invalid UTF-8 encoding in file '{path}'. File may be binary or use unsupported encoding.")]
    InvalidUtf8 {
        /// Path to file with encoding issues
        path: PathBuf,
    },

    /// JSON serialization error.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message
        message: String,
    },
}

impl Error {
    /// Creates an IO error with path context.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Creates an IO error from a directory walk failure.
    #[must_use]
    pub fn walk(root: impl Into<PathBuf>, source: &walkdir::Error) -> Self {
        let path = source.path().map_or_else(|| root.into(), |p| p.to_path_buf());
        Self::Io {
            path,
            message: source.to_string(),
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates an unknown policy error.
    #[must_use]
    pub fn invalid_policy(value: impl Into<String>) -> Self {
        Self::InvalidPolicy {
            value: value.into(),
        }
    }

    /// Creates a missing argument error.
    #[must_use]
    pub fn missing_argument(name: impl Into<String>) -> Self {
        Self::MissingArgument { name: name.into() }
    }

    /// Creates an invalid UTF-8 error.
    #[must_use]
    pub fn invalid_utf8(path: impl Into<PathBuf>) -> Self {
        Self::InvalidUtf8 { path: path.into() }
    }

    /// Returns true if this is an IO error.
    #[must_use]
    pub const fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Returns true if this is a configuration error.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }

    /// Returns true if this is an unknown policy error.
    #[must_use]
    pub const fn is_invalid_policy(&self) -> bool {
        matches!(self, Self::InvalidPolicy { .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization {
            message: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = Error::config("test message");
        assert!(err.is_config());
        assert!(err.to_string().contains("test message"));
    }

    #[test]
    fn test_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = Error::io("/tmp/docs/intro.mdx", io_err);
        assert!(err.is_io());
        assert!(err.to_string().contains("/tmp/docs/intro.mdx"));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_invalid_policy() {
        let err = Error::invalid_policy("bogus");
        assert!(err.is_invalid_policy());
        assert!(err.to_string().contains("'bogus'"));
        assert!(err.to_string().contains("folder"));
    }

    #[test]
    fn test_missing_argument() {
        let err = Error::missing_argument("sourcePath");
        assert_eq!(err.to_string(), "Missing required argument: sourcePath");
    }

    #[test]
    fn test_serialization_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: Error = json_err.into();
        assert!(err.to_string().contains("Serialization error"));
    }
}
