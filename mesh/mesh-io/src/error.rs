//! Error types for mesh I/O operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for mesh I/O operations.
pub type IoResult<T> = Result<T, IoError>;

/// Errors that can occur during mesh I/O operations.
#[derive(Debug, Error)]
pub enum IoError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was not found.
        path: PathBuf,
    },

    /// Unknown file format (unrecognized extension).
    #[error("unknown file format: .{extension}")]
    UnknownFormat {
        /// The unrecognized extension.
        extension: String,
    },

    /// The file is not a well-formed mesh of its format.
    #[error("invalid file content: {message}")]
    InvalidContent {
        /// Description of what was invalid.
        message: String,
    },

    /// Binary STL shorter than its declared triangle count.
    #[error("truncated STL: header declares {expected} triangles, file holds {got}")]
    InvalidFaceCount {
        /// Triangles declared in the header.
        expected: u32,
        /// Complete triangles present.
        got: u32,
    },

    /// I/O error from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl IoError {
    /// Create an `InvalidContent` error with the given message.
    #[must_use]
    pub fn invalid_content(message: impl Into<String>) -> Self {
        Self::InvalidContent {
            message: message.into(),
        }
    }

    /// Create an `InvalidContent` error pointing at a 1-based line.
    #[must_use]
    pub fn at_line(line: usize, message: impl std::fmt::Display) -> Self {
        Self::invalid_content(format!("line {line}: {message}"))
    }

    /// Whether the file itself was malformed, as opposed to unreadable.
    #[must_use]
    pub const fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::InvalidContent { .. } | Self::InvalidFaceCount { .. }
        )
    }
}

/// Open `path` for reading, mapping a missing file to [`IoError::FileNotFound`].
pub(crate) fn read_file(path: &std::path::Path) -> IoResult<Vec<u8>> {
    std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IoError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IoError::Io(e)
        }
    })
}
