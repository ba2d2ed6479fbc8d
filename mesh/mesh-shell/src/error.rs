//! Error types for shell operations.

use mesh_types::MeshError;
use thiserror::Error;

/// Result type alias for shell operations.
pub type ShellResult<T> = Result<T, ShellError>;

/// Errors that can occur during shell operations.
#[derive(Debug, Error)]
pub enum ShellError {
    /// Input mesh is malformed or empty.
    #[error(transparent)]
    Mesh(#[from] MeshError),

    /// Thickness must be a positive number. Solidify does nothing otherwise.
    #[error("solidify needs a positive thickness, got {thickness}")]
    NonPositiveThickness {
        /// The rejected thickness.
        thickness: f64,
    },
}

impl ShellError {
    /// Whether the caller's input was malformed.
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(self, Self::Mesh(_))
    }

    /// Whether a precondition of the operator was not met.
    #[must_use]
    pub const fn is_precondition(&self) -> bool {
        matches!(self, Self::NonPositiveThickness { .. })
    }
}
