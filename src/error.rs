use crate::client::ClientError;
use std::fmt;
use std::io;

/// Unified error type for the repository node and test harness.
///
/// This error type centralizes all failures that can occur on the server
/// side of the project and in the harness glue on top of it, providing a
/// consistent interface for error handling and propagation.
///
/// Each variant represents a specific category of errors, with associated
/// context to help with debugging and error reporting.
#[derive(Debug)]
pub enum DocRepoError {
    /// Errors related to repository object operations
    Repository(String),

    /// A requested object or repository does not exist
    NotFound(String),

    /// An operation that conflicts with the current state of an object,
    /// such as deleting an object under a retention hold
    Conflict(String),

    /// Errors related to configuration
    Config(String),

    /// Errors related to HTTP transport
    Http(String),

    /// Errors raised by the client session layer
    Session(ClientError),

    /// A per-test cleanup run that left the repository in a non-empty state
    Cleanup(String),

    /// Errors related to serialization/deserialization
    Serialization(String),

    /// Errors related to IO operations
    Io(io::Error),
}

impl fmt::Display for DocRepoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Repository(msg) => write!(f, "Repository error: {}", msg),
            Self::NotFound(msg) => write!(f, "Not found: {}", msg),
            Self::Conflict(msg) => write!(f, "Conflict: {}", msg),
            Self::Config(msg) => write!(f, "Configuration error: {}", msg),
            Self::Http(msg) => write!(f, "HTTP error: {}", msg),
            Self::Session(err) => write!(f, "Session error: {}", err),
            Self::Cleanup(msg) => write!(f, "Cleanup error: {}", msg),
            Self::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            Self::Io(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl std::error::Error for DocRepoError {}

/// Conversion from io::Error to DocRepoError
impl From<io::Error> for DocRepoError {
    fn from(error: io::Error) -> Self {
        DocRepoError::Io(error)
    }
}

/// Conversion from serde_json::Error to DocRepoError
impl From<serde_json::Error> for DocRepoError {
    fn from(error: serde_json::Error) -> Self {
        DocRepoError::Serialization(error.to_string())
    }
}

/// Conversion from ClientError to DocRepoError
impl From<ClientError> for DocRepoError {
    fn from(error: ClientError) -> Self {
        DocRepoError::Session(error)
    }
}

/// Result type alias for operations that can result in a DocRepoError
pub type DocRepoResult<T> = Result<T, DocRepoError>;
