//! Failures reported by the session.

use mesh_io::IoError;
use thiserror::Error;

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Why an operation did not change the working mesh.
///
/// Whatever the variant, the session's meshes are exactly as they were
/// before the call.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The mesh handed to the operator was malformed or empty.
    #[error("{operator}: invalid input: {message}")]
    Input {
        /// Operator name.
        operator: &'static str,
        /// What was wrong.
        message: String,
    },

    /// The operator cannot run on this mesh or in this state.
    #[error("{operator}: precondition not met: {message}")]
    Precondition {
        /// Operator name.
        operator: &'static str,
        /// Which precondition failed.
        message: String,
    },

    /// The operator panicked, failed unexpectedly, or produced a broken mesh.
    #[error("{operator} failed: {cause}")]
    Internal {
        /// Operator name.
        operator: &'static str,
        /// What went wrong.
        cause: String,
    },

    /// Loading or saving a file failed.
    #[error(transparent)]
    Io(#[from] IoError),
}

impl SessionError {
    pub(crate) fn precondition(operator: &'static str, message: impl Into<String>) -> Self {
        Self::Precondition {
            operator,
            message: message.into(),
        }
    }

    pub(crate) fn internal(operator: &'static str, cause: impl Into<String>) -> Self {
        Self::Internal {
            operator,
            cause: cause.into(),
        }
    }

    /// Whether this is an input error.
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(self, Self::Input { .. })
    }

    /// Whether this is a precondition failure.
    #[must_use]
    pub const fn is_precondition(&self) -> bool {
        matches!(self, Self::Precondition { .. })
    }

    /// Whether this is an unexpected internal failure.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal { .. })
    }

    /// Name of the operator that failed, if any.
    #[must_use]
    pub const fn operator(&self) -> Option<&'static str> {
        match self {
            Self::Input { operator, .. }
            | Self::Precondition { operator, .. }
            | Self::Internal { operator, .. } => Some(operator),
            Self::Io(_) => None,
        }
    }
}

/// Operator errors that know which failure class they belong to.
pub(crate) trait Classified: std::error::Error {
    fn is_input_error(&self) -> bool;
    fn is_precondition(&self) -> bool;

    fn into_session_error(self, operator: &'static str) -> SessionError
    where
        Self: Sized,
    {
        let message = self.to_string();
        if self.is_input_error() {
            SessionError::Input { operator, message }
        } else if self.is_precondition() {
            SessionError::Precondition { operator, message }
        } else {
            SessionError::Internal {
                operator,
                cause: message,
            }
        }
    }
}

macro_rules! classified {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Classified for $ty {
                fn is_input_error(&self) -> bool {
                    <$ty>::is_input_error(self)
                }

                fn is_precondition(&self) -> bool {
                    <$ty>::is_precondition(self)
                }
            }
        )*
    };
}

classified!(
    mesh_repair::RepairError,
    mesh_normals::NormalsError,
    mesh_topology::TopologyError,
    mesh_subdivide::SubdivideError,
    mesh_shell::ShellError,
    mesh_retopo::RetopoError,
);

impl Classified for mesh_types::MeshError {
    fn is_input_error(&self) -> bool {
        true
    }

    fn is_precondition(&self) -> bool {
        false
    }
}
