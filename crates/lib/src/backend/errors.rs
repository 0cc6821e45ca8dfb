//! Error types for backend selection.

use thiserror::Error;

/// Structured error types for backend construction.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum BackendError {
    /// The schema extracted from a request string has no registered
    /// constructor.
    #[error("no backend registered for schema '{schema}'")]
    BackendNotFound { schema: String },

    /// Network-style schemes are delegated to external collaborators and
    /// explicitly unsupported here.
    #[error("scheme '{scheme}' is not supported by the core")]
    UnsupportedScheme { scheme: String },
}

impl BackendError {
    /// Check if this error indicates an unregistered schema.
    pub fn is_not_found(&self) -> bool {
        matches!(self, BackendError::BackendNotFound { .. })
    }

    /// Check if this error indicates a delegated network scheme.
    pub fn is_unsupported_scheme(&self) -> bool {
        matches!(self, BackendError::UnsupportedScheme { .. })
    }

    /// Get the schema this error refers to.
    pub fn schema(&self) -> &str {
        match self {
            BackendError::BackendNotFound { schema } => schema,
            BackendError::UnsupportedScheme { scheme } => scheme,
        }
    }
}

impl From<BackendError> for crate::Error {
    fn from(err: BackendError) -> Self {
        crate::Error::Backend(err)
    }
}
